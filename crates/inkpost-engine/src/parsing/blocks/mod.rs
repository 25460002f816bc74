//! # Block Parsing
//!
//! Two-phase, single left-to-right scan over the protected text.
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` holding local facts (pipe, separator, quote marker,
//!    heading, rule, list marker, fenced code token).
//! 2. **Block Construction** (`builder`): a `BlockBuilder` with one line of
//!    lookahead emits `BlockNode`s in source order.
//!
//! ## Key Invariants
//!
//! - Priority is table, blockquote, heading, rule, list, raw.
//! - No nesting: list items are flat, quotes are a single level.
//! - Runs still open at end of input are flushed as complete blocks.

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod types;

pub use builder::{Advance, BlockBuilder};
pub use classify::{LineClass, MarkdownLineClassifier};
pub use kinds::{Alignment, ListKind};
pub use types::{BlockNode, BlockSegment};
