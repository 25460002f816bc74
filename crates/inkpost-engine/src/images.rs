//! Image source collaborator.
//!
//! Hosts that serve images from a CMS rewrite `src` values before render.
//! The converter only calls this for Markdown image syntax; `<img>` tags
//! written directly in the source are passed through untouched.

/// Resolves the `src` of a Markdown image.
pub trait ImageSource {
    fn resolve(&self, src: &str) -> String;
}

/// Leaves every source as written.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnchangedImages;

impl ImageSource for UnchangedImages {
    fn resolve(&self, src: &str) -> String {
        src.to_string()
    }
}

impl<F> ImageSource for F
where
    F: Fn(&str) -> String,
{
    fn resolve(&self, src: &str) -> String {
        self(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_image_sources() {
        let cdn = |src: &str| format!("https://cdn.example.com/{src}");
        assert_eq!(cdn.resolve("a.png"), "https://cdn.example.com/a.png");
        assert_eq!(UnchangedImages.resolve("a.png"), "a.png");
    }
}
