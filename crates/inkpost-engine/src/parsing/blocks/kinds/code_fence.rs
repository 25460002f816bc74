/// Which delimiter opened a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

/// Fenced code block syntax: ```` ``` ```` or `~~~` at the start of a line.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Detects a fence line, returning its kind and the trimmed info string
    /// (the language tag after the opening delimiter).
    ///
    /// A backtick line whose info string contains another backtick, such as
    /// ```` ```inline``` ````, is inline code and not a fence.
    pub fn sig(line: &str) -> Option<(FenceKind, &str)> {
        let t = line.trim_start();
        if let Some(info) = t.strip_prefix(Self::BACKTICKS) {
            let info = info.trim_start_matches('`').trim();
            (!info.contains('`')).then_some((FenceKind::Backticks, info))
        } else if let Some(info) = t.strip_prefix(Self::TILDES) {
            Some((FenceKind::Tildes, info.trim_start_matches('~').trim()))
        } else {
            None
        }
    }

    /// Whether `line` closes a fence opened with `kind`.
    pub fn closes(kind: FenceKind, line: &str) -> bool {
        matches!(Self::sig(line), Some((k, _)) if k == kind)
    }
}
