//! # Inline Transforms
//!
//! Applied to the text of raw lines, headings, table cells, list items and
//! quote lines after block parsing. Code spans and images are already
//! placeholder tokens at this point, so none of these passes can reach
//! inside them.
//!
//! Pass order: links, bold-italic, bold, italic, strikethrough.

pub mod cursor;
pub mod transform;

pub use cursor::Cursor;
pub use transform::InlineTransformer;
