/// Horizontal rule: a line that is exactly `---` or `***`.
pub struct HorizontalRule;

impl HorizontalRule {
    pub const FORMS: [&'static str; 2] = ["---", "***"];

    pub fn matches(line: &str) -> bool {
        Self::FORMS.contains(&line.trim())
    }
}
