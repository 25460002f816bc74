use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::blocks::{Alignment, BlockNode, BlockSegment, ListKind};
use crate::parsing::inline::InlineTransformer;

/// Raw text that already starts with one of these tags is emitted without a
/// `<p>` wrapper.
fn starts_with_block_tag(text: &str) -> bool {
    static BLOCK_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let block_tag_regex = BLOCK_TAG_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^</?(?:article|aside|blockquote|details|div|figure|h[1-6]|hr|iframe|li|ol|p|pre|section|table|tbody|td|th|thead|tr|ul|video)\b",
        )
        .expect("Invalid block tag regex")
    });
    block_tag_regex.is_match(text)
}

/// Joins block segments into one markup fragment.
///
/// Consecutive non-blank raw lines form one paragraph, with `<br>` between
/// the lines. Blank lines and block segments end a paragraph, so block
/// elements never end up inside `<p>`.
pub fn assemble(blocks: &[BlockNode], inline: &InlineTransformer) -> String {
    let mut parts: Vec<String> = vec![];
    let mut paragraph: Vec<&str> = vec![];

    for node in blocks {
        if let BlockSegment::RawLine { text } = &node.segment
            && !text.trim().is_empty()
        {
            paragraph.push(text.trim());
            continue;
        }
        flush_paragraph(&mut parts, &mut paragraph, inline);
        if let Some(html) = render_block(&node.segment, inline) {
            parts.push(html);
        }
    }
    flush_paragraph(&mut parts, &mut paragraph, inline);

    parts.join("\n")
}

fn flush_paragraph(parts: &mut Vec<String>, lines: &mut Vec<&str>, inline: &InlineTransformer) {
    if lines.is_empty() {
        return;
    }
    let rendered: Vec<String> = lines.drain(..).map(|l| inline.transform(l)).collect();
    if rendered.first().is_some_and(|l| starts_with_block_tag(l)) {
        parts.push(rendered.join("\n"));
    } else {
        parts.push(format!("<p>{}</p>", rendered.join("<br>")));
    }
}

fn render_block(segment: &BlockSegment, inline: &InlineTransformer) -> Option<String> {
    let html = match segment {
        BlockSegment::Heading { level, text } => {
            format!("<h{level}>{}</h{level}>", inline.transform(text))
        }
        BlockSegment::Table {
            header,
            alignments,
            rows,
        } => render_table(header, alignments, rows, inline),
        BlockSegment::Blockquote { lines } => {
            let body: Vec<String> = lines.iter().map(|l| inline.transform(l)).collect();
            format!("<blockquote>{}</blockquote>", body.join("<br>"))
        }
        BlockSegment::List { kind, start, items } => {
            let open = match (kind, start) {
                (ListKind::Unordered, _) => "<ul>".to_string(),
                (ListKind::Ordered, Some(n)) if *n != 1 => format!("<ol start=\"{n}\">"),
                (ListKind::Ordered, _) => "<ol>".to_string(),
            };
            let close = match kind {
                ListKind::Unordered => "</ul>",
                ListKind::Ordered => "</ol>",
            };
            let mut out = open;
            for item in items {
                out.push_str(&format!("\n<li>{}</li>", inline.transform(item)));
            }
            out.push('\n');
            out.push_str(close);
            out
        }
        BlockSegment::HorizontalRule => "<hr>".to_string(),
        BlockSegment::ProtectedBlock { token } => token.clone(),
        // Non-blank raw lines are collected by the paragraph assembler.
        BlockSegment::RawLine { .. } => return None,
    };
    Some(html)
}

fn render_table(
    header: &[String],
    alignments: &[Alignment],
    rows: &[Vec<String>],
    inline: &InlineTransformer,
) -> String {
    let row = |cells: &[String], tag: &str| {
        let mut out = String::from("<tr>");
        for (i, cell) in cells.iter().enumerate() {
            match alignments.get(i).and_then(|a| a.css()) {
                Some(align) => out.push_str(&format!("<{tag} style=\"text-align: {align}\">")),
                None => out.push_str(&format!("<{tag}>")),
            }
            out.push_str(&inline.transform(cell));
            out.push_str(&format!("</{tag}>"));
        }
        out.push_str("</tr>");
        out
    };

    let mut out = String::from("<table>\n<thead>\n");
    out.push_str(&row(header, "th"));
    out.push_str("\n</thead>\n<tbody>\n");
    for r in rows {
        out.push_str(&row(r, "td"));
        out.push('\n');
    }
    out.push_str("</tbody>\n</table>");
    out
}
