//! Block kinds that own their syntax.
//!
//! All delimiter knowledge lives here; the classifier and builder only call
//! into these types.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod list;
pub mod rule;
pub mod table;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind};
pub use heading::Heading;
pub use list::{ListItemLine, ListKind, ListMarker};
pub use rule::HorizontalRule;
pub use table::{Alignment, Table};
