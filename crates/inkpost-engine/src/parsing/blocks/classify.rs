use crate::parsing::rope::{lines::LineRef, span::Span};
use crate::protect::Token;

use super::kinds::{BlockQuote, Heading, HorizontalRule, ListItemLine, ListMarker, Table};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context. Every recogniser runs; which
/// one wins is decided by the builder.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// Full byte span of this line in the rope.
    pub line: Span,
    /// Line text without the terminator.
    pub text: String,
    pub is_blank: bool,
    /// The line contains a `|` and may be a table row.
    pub has_pipe: bool,
    pub is_table_separator: bool,
    /// Content after the `>` marker.
    pub quote: Option<String>,
    pub heading: Option<(u8, String)>,
    pub is_rule: bool,
    pub list_item: Option<ListItemLine>,
    /// Set when the line is exactly one fenced code token.
    pub protected_block: Option<String>,
}

/// Classifies individual lines for the block parsing phase.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        let text = lr.text.as_str();
        let trimmed = text.trim();

        let protected_block = Token::parse_exact(trimmed)
            .filter(|t| t.kind.is_block())
            .map(|_| trimmed.to_string());

        LineClass {
            line: lr.span,
            text: text.to_string(),
            is_blank: trimmed.is_empty(),
            has_pipe: Table::is_row(text),
            is_table_separator: Table::is_separator(text),
            quote: BlockQuote::strip_marker(text).map(str::to_string),
            heading: Heading::parse(text).map(|(level, t)| (level, t.to_string())),
            is_rule: HorizontalRule::matches(text),
            list_item: ListMarker::parse(text),
            protected_block,
        }
    }
}
