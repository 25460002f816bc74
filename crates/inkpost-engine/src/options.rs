use std::fmt;

use serde::{Deserialize, Serialize};

/// Which block recognisers may claim lines. A disabled recogniser never
/// claims a line; the line falls through to the next one in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockOptions {
    pub tables: bool,
    pub blockquotes: bool,
    pub headings: bool,
    pub rules: bool,
    pub lists: bool,
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            tables: true,
            blockquotes: true,
            headings: true,
            rules: true,
            lists: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// The protect / block / inline / assemble / restore pipeline.
    #[default]
    Builtin,
    /// pulldown-cmark with tables and strikethrough enabled.
    Pulldown,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Builtin => write!(f, "builtin"),
            EngineKind::Pulldown => write!(f, "pulldown"),
        }
    }
}

/// The single configuration surface shared by every rendering front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub engine: EngineKind,
    /// Fewer headings than this and the TOC is empty. Anchors are assigned
    /// regardless.
    pub min_toc_headings: usize,
    pub strikethrough: bool,
    pub blocks: BlockOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            min_toc_headings: 1,
            strikethrough: true,
            blocks: BlockOptions::default(),
        }
    }
}
