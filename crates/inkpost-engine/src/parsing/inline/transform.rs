use std::sync::OnceLock;

use regex::Regex;

/// One inline substitution: a pattern and its replacement template.
struct Rule {
    regex: Regex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        regex: Regex::new(pattern).expect("Invalid inline regex"),
        replacement,
    }
}

/// Rules in application order. Earlier rules win on overlapping markers:
/// `***a***` is bold-italic, never bold around `*a*`.
fn rules() -> &'static [Rule; 4] {
    static RULES: OnceLock<[Rule; 4]> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            rule(r"\[([^\]]+)\]\(([^)\s]+)\)", r#"<a href="${2}">${1}</a>"#),
            rule(r"\*\*\*(.+?)\*\*\*", "<strong><em>${1}</em></strong>"),
            rule(r"\*\*(.+?)\*\*", "<strong>${1}</strong>"),
            rule(r"\*(.+?)\*", "<em>${1}</em>"),
        ]
    })
}

fn strikethrough() -> &'static Rule {
    static STRIKE: OnceLock<Rule> = OnceLock::new();
    STRIKE.get_or_init(|| rule(r"~~(.+?)~~", "<del>${1}</del>"))
}

/// Applies link, emphasis and strikethrough syntax to a line of text.
///
/// Each pass is a left-to-right, non-overlapping substitution over the
/// output of the previous pass. Interleaved markers such as `**a *b** c*`
/// resolve by whichever pass matches first, not by CommonMark precedence.
#[derive(Debug, Clone, Copy)]
pub struct InlineTransformer {
    strikethrough: bool,
}

impl InlineTransformer {
    pub fn new(strikethrough: bool) -> Self {
        Self { strikethrough }
    }

    pub fn transform(&self, text: &str) -> String {
        let mut out = text.to_string();
        for r in rules() {
            out = r.regex.replace_all(&out, r.replacement).into_owned();
        }
        if self.strikethrough {
            let r = strikethrough();
            out = r.regex.replace_all(&out, r.replacement).into_owned();
        }
        out
    }
}

impl Default for InlineTransformer {
    fn default() -> Self {
        Self::new(true)
    }
}
