//! Markdown-subset to HTML conversion for blog content, with heading anchors,
//! a table of contents and a scroll-spy for keeping one TOC entry active.
//!
//! ```
//! use inkpost_engine::{RenderOptions, convert};
//!
//! let out = convert("# Title\n\nSome **bold** text.", &RenderOptions::default());
//! assert_eq!(
//!     out.html,
//!     "<h1 id=\"heading-0\">Title</h1>\n<p>Some <strong>bold</strong> text.</p>"
//! );
//! assert_eq!(out.toc.entries()[0].id, "heading-0");
//! ```

pub mod convert;
pub mod error;
pub mod images;
pub mod options;
pub mod parsing;
pub mod protect;
pub mod render;
pub mod scroll_spy;
pub mod toc;

pub use convert::{Conversion, Converter, convert};
pub use error::ConvertError;
pub use images::{ImageSource, UnchangedImages};
pub use options::{BlockOptions, EngineKind, RenderOptions};
pub use scroll_spy::{
    ActiveMarkerSink, ObserverOptions, RootMargin, ScrollSpy, SpyState, VisibilityEntry,
    VisibilityObserver,
};
pub use toc::{HeadingRecord, Toc, TocEntry, extract_headings};
