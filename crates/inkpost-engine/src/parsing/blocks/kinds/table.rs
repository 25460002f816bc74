/// Column alignment taken from the colons of a separator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Default,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS `text-align` value, if the column asks for one.
    pub fn css(self) -> Option<&'static str> {
        match self {
            Alignment::Default => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

/// Pipe table syntax.
pub struct Table;

impl Table {
    pub const PIPE: char = '|';

    pub fn is_row(line: &str) -> bool {
        line.contains(Self::PIPE)
    }

    /// A separator holds only pipes, colons, dashes and whitespace, with at
    /// least one pipe and one dash.
    pub fn is_separator(line: &str) -> bool {
        let t = line.trim();
        t.contains(Self::PIPE)
            && t.contains('-')
            && t.chars()
                .all(|c| c == Self::PIPE || c == ':' || c == '-' || c.is_whitespace())
    }

    /// Splits a row into trimmed cells, dropping one leading and one trailing
    /// pipe. No padding or truncation happens here.
    pub fn split_cells(line: &str) -> Vec<String> {
        let t = line.trim();
        let t = t.strip_prefix(Self::PIPE).unwrap_or(t);
        let t = t.strip_suffix(Self::PIPE).unwrap_or(t);
        t.split(Self::PIPE).map(|c| c.trim().to_string()).collect()
    }

    pub fn alignments(separator: &str) -> Vec<Alignment> {
        Self::split_cells(separator)
            .iter()
            .map(|cell| match (cell.starts_with(':'), cell.ends_with(':')) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::Default,
            })
            .collect()
    }
}
