pub mod blocks;
pub mod inline;
pub mod rope;

use xi_rope::Rope;

use crate::options::BlockOptions;
use blocks::{Advance, BlockBuilder, BlockNode, LineClass, MarkdownLineClassifier};
use rope::lines_with_spans;

#[derive(Debug)]
pub struct ParsedDoc {
    pub blocks: Vec<BlockNode>,
}

/// Splits protected text into block segments in source order.
pub fn parse_document(rope: &Rope, options: &BlockOptions) -> ParsedDoc {
    let classifier = MarkdownLineClassifier;
    let lines: Vec<LineClass> = lines_with_spans(rope)
        .map(|lr| classifier.classify(&lr))
        .collect();

    let mut builder = BlockBuilder::new(options);
    let mut i = 0;
    while i < lines.len() {
        match builder.push(&lines[i], lines.get(i + 1)) {
            Advance::Line => i += 1,
            Advance::LineAndNext => i += 2,
        }
    }

    ParsedDoc {
        blocks: builder.finish(),
    }
}
