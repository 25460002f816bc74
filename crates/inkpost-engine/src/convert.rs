//! # Conversion pipeline
//!
//! ```text
//! source ─► protect ─► Rope ─► parse_document ─► assemble ─► restore ─► extract_headings
//!                                                                          │
//!                                                             Conversion { html, toc }
//! ```
//!
//! Conversion never fails from the caller's point of view. A panic inside
//! the selected engine is caught and logged, and the builtin pipeline runs
//! instead; if that panics as well the source is shown escaped in a `<pre>`
//! block with an empty TOC.

use std::panic::{AssertUnwindSafe, catch_unwind};

use pulldown_cmark::{Event, Options, Parser, Tag};
use serde::Serialize;
use xi_rope::Rope;

use crate::error::ConvertError;
use crate::images::{ImageSource, UnchangedImages};
use crate::options::{EngineKind, RenderOptions};
use crate::parsing::inline::InlineTransformer;
use crate::parsing::parse_document;
use crate::protect::{protect, restore};
use crate::render::assemble;
use crate::toc::{Toc, extract_headings};

/// A converted document: the anchored fragment and its TOC.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub html: String,
    pub toc: Toc,
}

/// Converts documents with fixed options and image source.
pub struct Converter {
    options: RenderOptions,
    images: Box<dyn ImageSource>,
}

impl Converter {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            images: Box::new(UnchangedImages),
        }
    }

    pub fn with_image_source(mut self, images: impl ImageSource + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn convert(&self, source: &str) -> Conversion {
        let engine = self.options.engine;
        let first = self.run_guarded(engine, source);
        let err = match first {
            Ok(conversion) => return conversion,
            Err(err) => err,
        };
        log::warn!("{err}");

        if engine != EngineKind::Builtin {
            log::warn!("retrying with the {} engine", EngineKind::Builtin);
            match self.run_guarded(EngineKind::Builtin, source) {
                Ok(conversion) => return conversion,
                Err(err) => log::warn!("{err}"),
            }
        }

        log::warn!("showing escaped source");
        escaped_source(source)
    }

    fn run_guarded(&self, engine: EngineKind, source: &str) -> Result<Conversion, ConvertError> {
        catch_unwind(AssertUnwindSafe(|| self.run(engine, source)))
            .map_err(|payload| ConvertError::from_panic(engine, payload))
    }

    fn run(&self, engine: EngineKind, source: &str) -> Conversion {
        let fragment = match engine {
            EngineKind::Builtin => builtin_fragment(source, &self.options, self.images.as_ref()),
            EngineKind::Pulldown => pulldown_fragment(source, &self.options, self.images.as_ref()),
        };
        let (html, toc) = extract_headings(&fragment, self.options.min_toc_headings);
        Conversion { html, toc }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Converts `source` with `options`, leaving image sources as written.
pub fn convert(source: &str, options: &RenderOptions) -> Conversion {
    Converter::new(options.clone()).convert(source)
}

fn builtin_fragment(source: &str, options: &RenderOptions, images: &dyn ImageSource) -> String {
    let protected = protect(source, images);
    let rope = Rope::from(protected.text.as_str());
    let doc = parse_document(&rope, &options.blocks);
    log::debug!(
        "builtin engine: {} block segment(s), {} protected span(s)",
        doc.blocks.len(),
        protected.spans.len()
    );

    let inline = InlineTransformer::new(options.strikethrough);
    let assembled = assemble(&doc.blocks, &inline);
    restore(&assembled, protected.spans)
}

fn pulldown_fragment(source: &str, options: &RenderOptions, images: &dyn ImageSource) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    if options.strikethrough {
        opts.insert(Options::ENABLE_STRIKETHROUGH);
    }

    let events = Parser::new_ext(source, opts).map(|event| match event {
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: images.resolve(&dest_url).into(),
            title,
            id,
        }),
        other => other,
    });

    let mut html = String::with_capacity(source.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events);
    log::debug!("pulldown engine: {} byte(s) of markup", html.len());
    html
}

fn escaped_source(source: &str) -> Conversion {
    Conversion {
        html: format!("<pre>{}</pre>", html_escape::encode_text(source)),
        toc: Toc::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn builtin_is_default() {
        let c = Converter::default().convert("# Hi\n\ntext");
        assert_eq!(c.html, "<h1 id=\"heading-0\">Hi</h1>\n<p>text</p>");
        assert_eq!(c.toc.len(), 1);
    }

    #[test]
    fn pulldown_output_is_anchored_too() {
        let options = RenderOptions {
            engine: EngineKind::Pulldown,
            ..RenderOptions::default()
        };
        let c = convert("# Hi\n\n## There", &options);
        assert_eq!(
            c.html,
            "<h1 id=\"heading-0\">Hi</h1>\n<h2 id=\"heading-1\">There</h2>\n"
        );
        assert_eq!(c.toc.entries()[1].indent, 1);
    }

    #[test]
    fn image_source_applies_to_both_engines() {
        for engine in [EngineKind::Builtin, EngineKind::Pulldown] {
            let options = RenderOptions {
                engine,
                ..RenderOptions::default()
            };
            let c = Converter::new(options)
                .with_image_source(|src: &str| format!("/cdn/{src}"))
                .convert("![a](p.png)");
            assert!(c.html.contains("src=\"/cdn/p.png\""), "{engine}: {}", c.html);
        }
    }

    #[test]
    fn panicking_builtin_shows_escaped_source() {
        let c = Converter::default()
            .with_image_source(|_: &str| -> String { panic!("image lookup failed") })
            .convert("# T\n![x](y.png) <b>");
        assert_eq!(c.html, "<pre># T\n![x](y.png) &lt;b&gt;</pre>");
        assert!(c.toc.is_empty());
    }

    #[test]
    fn panicking_pulldown_falls_back_to_builtin() {
        let calls = Cell::new(0);
        let flaky = move |src: &str| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                panic!("first lookup fails");
            }
            src.to_string()
        };
        let options = RenderOptions {
            engine: EngineKind::Pulldown,
            ..RenderOptions::default()
        };
        let c = Converter::new(options)
            .with_image_source(flaky)
            .convert("# T\n![x](y.png)");
        assert_eq!(
            c.html,
            "<h1 id=\"heading-0\">T</h1>\n<p><img src=\"y.png\" alt=\"x\"></p>"
        );
    }
}
