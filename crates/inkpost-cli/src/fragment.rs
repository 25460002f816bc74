//! Plain-text lines for showing a converted fragment in the terminal.

use inkpost_engine::render::html::{Node, tokenize};

/// One terminal line. Heading lines carry the anchor id the TOC links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub text: String,
    pub heading: Option<Heading>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub id: String,
    pub level: u8,
}

/// Flattens markup into display lines. Every source line of the fragment
/// and every `<br>` starts a new line; tags are dropped and entities
/// decoded.
pub fn display_lines(html: &str) -> Vec<DisplayLine> {
    let mut lines = vec![];
    for source_line in html.lines() {
        for part in source_line.split("<br>") {
            lines.push(display_line(part));
        }
    }
    lines
}

fn display_line(markup: &str) -> DisplayLine {
    let mut text = String::new();
    let mut heading = None;

    for node in tokenize(markup) {
        match node {
            Node::Start(tag) => match tag.name.as_str() {
                "li" => text.push_str("• "),
                "td" | "th" if !text.is_empty() => text.push_str(" │ "),
                "hr" => text.push_str("────────"),
                "img" => {
                    let alt = tag.attr("alt").and_then(|a| a.value.as_deref());
                    text.push_str(&format!("[image: {}]", alt.unwrap_or("")));
                }
                name => {
                    if let [b'h', d @ b'1'..=b'6'] = name.as_bytes()
                        && let Some(id) = tag.attr("id").and_then(|a| a.value.clone())
                    {
                        heading = Some(Heading { id, level: d - b'0' });
                    }
                }
            },
            Node::Text(span) => {
                text.push_str(&html_escape::decode_html_entities(
                    &markup[span.start..span.end],
                ));
            }
            Node::End { .. } | Node::Comment(_) => {}
        }
    }

    if let Some(h) = &heading {
        text = format!("{} {}", "#".repeat(h.level as usize), text.trim());
    }
    DisplayLine { text, heading }
}
