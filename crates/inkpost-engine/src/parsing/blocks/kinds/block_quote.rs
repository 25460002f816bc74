/// Blockquote line syntax.
///
/// Only a single level is recognised: `>> nested` yields the line
/// `> nested`, which is rendered as text.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// Strips the quote marker (and one following space) from a line whose
    /// trimmed form starts with `>`.
    pub fn strip_marker(line: &str) -> Option<&str> {
        let rest = line.trim().strip_prefix(Self::PREFIX)?;
        Some(rest.strip_prefix(' ').unwrap_or(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_no_quote() {
        assert_eq!(BlockQuote::strip_marker("hello"), None);
    }

    #[test]
    fn strip_single_quote() {
        assert_eq!(BlockQuote::strip_marker("> hello"), Some("hello"));
    }

    #[test]
    fn strip_without_space() {
        assert_eq!(BlockQuote::strip_marker("   >hello"), Some("hello"));
    }

    #[test]
    fn bare_marker_is_empty_line() {
        assert_eq!(BlockQuote::strip_marker(">"), Some(""));
    }

    #[test]
    fn nested_marker_kept_as_text() {
        assert_eq!(BlockQuote::strip_marker(">> deeper"), Some("> deeper"));
    }
}
