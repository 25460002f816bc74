/// Whether a list is bulleted or numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// A recognised list item line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemLine {
    pub kind: ListKind,
    /// The number written before `.` for ordered items.
    pub number: Option<u64>,
    pub text: String,
}

/// List item syntax: `-`, `*` or `+` followed by whitespace, or digits
/// followed by `.` and whitespace. Indentation is ignored.
pub struct ListMarker;

impl ListMarker {
    pub const BULLETS: [char; 3] = ['-', '*', '+'];

    pub fn parse(line: &str) -> Option<ListItemLine> {
        let t = line.trim_start();
        let mut chars = t.chars();
        let first = chars.next()?;

        if Self::BULLETS.contains(&first) {
            let rest = &t[first.len_utf8()..];
            if !rest.starts_with(char::is_whitespace) {
                return None;
            }
            return Some(ListItemLine {
                kind: ListKind::Unordered,
                number: None,
                text: rest.trim().to_string(),
            });
        }

        let digits = t.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let rest = t[digits..].strip_prefix('.')?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(ListItemLine {
            kind: ListKind::Ordered,
            number: t[..digits].parse().ok(),
            text: rest.trim().to_string(),
        })
    }
}
