use crate::parsing::rope::span::Span;

use super::kinds::{Alignment, ListKind};

/// One structurally recognised unit of the document.
///
/// Text fields hold the source text with block syntax removed; inline
/// syntax and placeholder tokens are still present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSegment {
    Heading {
        /// 1 to 6.
        level: u8,
        text: String,
    },
    Table {
        header: Vec<String>,
        /// One entry per separator cell; may be shorter or longer than a row.
        alignments: Vec<Alignment>,
        /// Rows as written, without padding to the header width.
        rows: Vec<Vec<String>>,
    },
    Blockquote {
        lines: Vec<String>,
    },
    List {
        kind: ListKind,
        /// First number of an ordered list.
        start: Option<u64>,
        items: Vec<String>,
    },
    HorizontalRule,
    /// A line holding only a fenced code or `<pre>` placeholder token.
    ProtectedBlock {
        token: String,
    },
    /// Anything no recogniser claimed, blank lines included.
    RawLine {
        text: String,
    },
}

/// A segment together with the source lines it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub segment: BlockSegment,
    /// Byte span over the protected text, including consumed separator lines.
    pub span: Span,
}
