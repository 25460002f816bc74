//! Minimal tag scanner over produced markup.
//!
//! This is not an HTML parser. It understands start tags with attributes,
//! end tags, comments and text, which is all the heading walk needs. A `<`
//! that does not start a tag is text.

use crate::parsing::inline::Cursor;
use crate::parsing::rope::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercased tag name.
    pub name: String,
    pub attrs: Vec<Attr>,
    pub self_closing: bool,
    /// Byte span of the whole tag, `<` through `>`.
    pub span: Span,
}

impl StartTag {
    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Writes the tag back out with `id` set to `id`, replacing any existing
    /// `id` attribute.
    pub fn to_html_with_id(&self, id: &str) -> String {
        let mut out = format!(
            "<{} id=\"{}\"",
            self.name,
            html_escape::encode_double_quoted_attribute(id)
        );
        for attr in self
            .attrs
            .iter()
            .filter(|a| !a.name.eq_ignore_ascii_case("id"))
        {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.value {
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
        }
        out.push_str(if self.self_closing { " />" } else { ">" });
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Start(StartTag),
    End { name: String, span: Span },
    Text(Span),
    Comment(Span),
}

/// Splits markup into tags, comments and text runs, in document order.
pub fn tokenize(markup: &str) -> Vec<Node> {
    let mut cur = Cursor::new(markup);
    let mut out = vec![];
    let mut text_start = 0;

    fn flush_text(out: &mut Vec<Node>, start: usize, end: usize) {
        if end > start {
            out.push(Node::Text(Span { start, end }));
        }
    }

    while cur.skip_to("<") {
        let start = cur.pos();
        let saved = cur.clone();

        let node = if cur.starts_with("<!--") {
            cur.bump_n(4);
            let closed = cur.skip_to("-->");
            cur.bump_n(3);
            closed.then(|| Node::Comment(Span::new(start, cur.pos())))
        } else {
            try_parse_tag(&mut cur)
        };

        match node {
            Some(node) => {
                flush_text(&mut out, text_start, start);
                out.push(node);
                text_start = cur.pos();
            }
            None => {
                cur = saved;
                cur.bump();
            }
        }
    }

    flush_text(&mut out, text_start, markup.len());
    out
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}

fn read_name(cur: &mut Cursor<'_>) -> String {
    let start = cur.pos();
    while cur.peek().is_some_and(is_name_byte) {
        cur.bump();
    }
    cur.slice(start, cur.pos()).to_ascii_lowercase()
}

fn skip_ws(cur: &mut Cursor<'_>) {
    while cur.peek().is_some_and(|b| b.is_ascii_whitespace()) {
        cur.bump();
    }
}

/// Parses a start or end tag at `<`. Returns `None` (cursor position
/// unspecified) if there is no well-formed tag here.
fn try_parse_tag(cur: &mut Cursor<'_>) -> Option<Node> {
    let start = cur.pos();
    cur.bump(); // <

    if cur.peek() == Some(b'/') {
        cur.bump();
        if !cur.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        let name = read_name(cur);
        if !cur.skip_to(">") {
            return None;
        }
        cur.bump();
        return Some(Node::End {
            name,
            span: Span::new(start, cur.pos()),
        });
    }

    if !cur.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let name = read_name(cur);
    let mut attrs = vec![];

    loop {
        skip_ws(cur);
        match cur.peek()? {
            b'>' => {
                cur.bump();
                return Some(Node::Start(StartTag {
                    name,
                    attrs,
                    self_closing: false,
                    span: Span::new(start, cur.pos()),
                }));
            }
            b'/' if cur.starts_with("/>") => {
                cur.bump_n(2);
                return Some(Node::Start(StartTag {
                    name,
                    attrs,
                    self_closing: true,
                    span: Span::new(start, cur.pos()),
                }));
            }
            b'/' | b'=' => {
                cur.bump();
            }
            b'<' => return None,
            _ => attrs.push(read_attr(cur)?),
        }
    }
}

fn read_attr(cur: &mut Cursor<'_>) -> Option<Attr> {
    let name_start = cur.pos();
    while cur
        .peek()
        .is_some_and(|b| !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'<'))
    {
        cur.bump();
    }
    let name = cur.slice(name_start, cur.pos()).to_ascii_lowercase();

    skip_ws(cur);
    if cur.peek() != Some(b'=') {
        return Some(Attr { name, value: None });
    }
    cur.bump();
    skip_ws(cur);

    let value = match cur.peek()? {
        q @ (b'"' | b'\'') => {
            cur.bump();
            let value_start = cur.pos();
            let quote = if q == b'"' { "\"" } else { "'" };
            if !cur.skip_to(quote) {
                return None;
            }
            let raw = cur.slice(value_start, cur.pos());
            cur.bump();
            raw
        }
        _ => {
            let value_start = cur.pos();
            while cur
                .peek()
                .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
            {
                cur.bump();
            }
            cur.slice(value_start, cur.pos())
        }
    };

    Some(Attr {
        name,
        value: Some(html_escape::decode_html_entities(value).into_owned()),
    })
}
