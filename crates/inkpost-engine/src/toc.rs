//! # Heading anchors and table of contents
//!
//! Walks the tag structure of a finished fragment, gives every `<h1>`–`<h6>`
//! the id `heading-{n}` in document order, and builds the TOC from the same
//! walk. No rendering surface is involved.

use serde::Serialize;

use crate::render::html::{Node, StartTag, tokenize};

/// Prefix of every assigned heading id.
pub const HEADING_ID_PREFIX: &str = "heading-";

/// One heading found in the fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingRecord {
    /// Zero-based position in document order.
    pub index: usize,
    pub level: u8,
    /// Text content with tags stripped and entities decoded.
    pub text: String,
    pub id: String,
}

/// A TOC line: a heading plus its indentation below the shallowest level
/// present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub index: usize,
    pub level: u8,
    pub indent: u8,
    pub text: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Toc {
    entries: Vec<TocEntry>,
}

impl Toc {
    /// Builds the TOC, or an empty one when fewer than `min_headings`
    /// headings exist.
    pub fn from_headings(headings: &[HeadingRecord], min_headings: usize) -> Self {
        if headings.is_empty() || headings.len() < min_headings {
            return Self::default();
        }
        let top = headings.iter().map(|h| h.level).min().unwrap_or(1);
        Self {
            entries: headings
                .iter()
                .map(|h| TocEntry {
                    index: h.index,
                    level: h.level,
                    indent: h.level - top,
                    text: h.text.clone(),
                    id: h.id.clone(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }
}

/// Result of anchoring a fragment.
#[derive(Debug, Clone)]
pub struct Anchored {
    pub html: String,
    pub headings: Vec<HeadingRecord>,
}

pub fn heading_id(index: usize) -> String {
    format!("{HEADING_ID_PREFIX}{index}")
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}

/// Assigns `heading-{n}` ids to every heading element in `markup`.
///
/// With no headings the fragment is returned unchanged. Existing `id`
/// attributes on headings are replaced, so anchoring an anchored fragment
/// again gives the same result.
pub fn anchor_headings(markup: &str) -> Anchored {
    struct Open {
        name: String,
        level: u8,
        text: String,
    }

    let nodes = tokenize(markup);
    let mut headings = vec![];
    let mut rewrites: Vec<(&StartTag, String)> = vec![];
    let mut open: Option<Open> = None;

    for node in &nodes {
        match node {
            Node::Start(tag) if open.is_none() => {
                if let Some(level) = heading_level(&tag.name) {
                    let id = heading_id(rewrites.len());
                    rewrites.push((tag, id));
                    open = Some(Open {
                        name: tag.name.clone(),
                        level,
                        text: String::new(),
                    });
                }
            }
            Node::Text(span) => {
                if let Some(o) = open.as_mut() {
                    o.text.push_str(&markup[span.start..span.end]);
                }
            }
            Node::End { name, .. } if open.as_ref().is_some_and(|o| &o.name == name) => {
                if let Some(o) = open.take() {
                    headings.push(finish_record(headings.len(), o.level, &o.text));
                }
            }
            _ => {}
        }
    }
    // A heading left open by malformed raw markup still counts.
    if let Some(o) = open.take() {
        headings.push(finish_record(headings.len(), o.level, &o.text));
    }

    if rewrites.is_empty() {
        return Anchored {
            html: markup.to_string(),
            headings,
        };
    }

    let mut html = String::with_capacity(markup.len() + rewrites.len() * 16);
    let mut last = 0;
    for (tag, id) in &rewrites {
        html.push_str(&markup[last..tag.span.start]);
        html.push_str(&tag.to_html_with_id(id));
        last = tag.span.end;
    }
    html.push_str(&markup[last..]);

    Anchored { html, headings }
}

fn finish_record(index: usize, level: u8, raw_text: &str) -> HeadingRecord {
    let decoded = html_escape::decode_html_entities(raw_text);
    HeadingRecord {
        index,
        level,
        text: decoded.split_whitespace().collect::<Vec<_>>().join(" "),
        id: heading_id(index),
    }
}

/// Anchors headings and builds the TOC in one step.
pub fn extract_headings(markup: &str, min_headings: usize) -> (String, Toc) {
    let anchored = anchor_headings(markup);
    let toc = Toc::from_headings(&anchored.headings, min_headings);
    log::debug!(
        "anchored {} heading(s), toc has {} entr(ies)",
        anchored.headings.len(),
        toc.len()
    );
    (anchored.html, toc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_follow_document_order() {
        let (html, toc) = extract_headings("<h2>B</h2>\n<p>x</p>\n<h1>A</h1>\n<h3>C</h3>", 1);
        assert_eq!(
            html,
            "<h2 id=\"heading-0\">B</h2>\n<p>x</p>\n<h1 id=\"heading-1\">A</h1>\n<h3 id=\"heading-2\">C</h3>"
        );
        let got: Vec<(u8, u8, &str, &str)> = toc
            .entries()
            .iter()
            .map(|e| (e.level, e.indent, e.text.as_str(), e.id.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (2, 1, "B", "heading-0"),
                (1, 0, "A", "heading-1"),
                (3, 2, "C", "heading-2"),
            ]
        );
    }

    #[test]
    fn no_headings_leaves_fragment_untouched() {
        let markup = "<p>just <em>text</em></p>";
        let (html, toc) = extract_headings(markup, 1);
        assert_eq!(html, markup);
        assert!(toc.is_empty());
    }

    #[test]
    fn visible_text_strips_tags_and_decodes() {
        let (_, toc) =
            extract_headings("<h2>Use <code>&lt;T&gt;</code>\n  &amp; <em>more</em></h2>", 1);
        assert_eq!(toc.entries()[0].text, "Use <T> & more");
    }

    #[test]
    fn threshold_hides_toc_but_keeps_anchors() {
        let (html, toc) = extract_headings("<h1>Only</h1>", 2);
        assert_eq!(html, "<h1 id=\"heading-0\">Only</h1>");
        assert!(toc.is_empty());
    }

    #[test]
    fn anchoring_twice_is_stable() {
        let (once, _) = extract_headings("<h1>A</h1><h2 class=\"x\">B</h2>", 1);
        let (twice, _) = extract_headings(&once, 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn headings_in_comments_are_ignored() {
        let (_, toc) = extract_headings("<!-- <h1>no</h1> --><h4>yes</h4>", 1);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc.entries()[0].indent, 0);
    }

    #[test]
    fn toc_serializes_as_list() {
        let (_, toc) = extract_headings("<h1>Title</h1>", 1);
        assert_eq!(
            serde_json::to_value(&toc).unwrap(),
            serde_json::json!([
                {"index": 0, "level": 1, "indent": 0, "text": "Title", "id": "heading-0"}
            ])
        );
    }
}
