//! # Placeholder Protection
//!
//! Fenced code blocks, inline code spans and images are swapped for opaque
//! tokens before any block or inline transform runs, and swapped back by
//! [`restore`] once the markup is assembled.
//!
//! Order matters: fences first (a fence body may contain backticks), then
//! `<pre>`, `<code>` and `<img>` elements already present in the input, then
//! inline code, then Markdown images. Markup that is already HTML is kept
//! verbatim, so protecting and restoring a converted fragment is a no-op.
//! Markdown image syntax is rendered to an `<img>` tag here, through the
//! [`ImageSource`], and protected like a raw tag.
//!
//! A later pass never stores an earlier token inside its own span: tokens
//! caught inside a code span or an image are put back to their original text
//! first (see [`ProtectedSpans::unprotect`]).
//!
//! A source that already contains a literal `__PROTECTED_...__` string
//! produces wrong output; that collision is not detected.

pub mod restore;
pub mod token;

use std::sync::OnceLock;

use regex::Regex;

use crate::images::ImageSource;
use crate::parsing::blocks::kinds::CodeFence;
use crate::parsing::inline::cursor::Cursor;

pub use restore::restore;
pub use token::{ProtectedKind, Token};

/// One protected region of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedSpan {
    pub kind: ProtectedKind,
    /// The exact source text that was replaced.
    pub original: String,
    /// Code body for fences and code spans; the element itself for raw
    /// elements and images.
    pub body: String,
    /// Info string after an opening fence.
    pub language: Option<String>,
}

/// Arena of protected spans, indexed by the number carried in each token.
#[derive(Debug, Default, Clone)]
pub struct ProtectedSpans {
    spans: Vec<Option<ProtectedSpan>>,
}

impl ProtectedSpans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, token: Token) -> Option<&ProtectedSpan> {
        self.spans
            .get(token.index)?
            .as_ref()
            .filter(|s| s.kind == token.kind)
    }

    /// Removes the span a token refers to. A second `take` of the same token,
    /// or a token whose kind does not match, yields `None`.
    pub fn take(&mut self, token: Token) -> Option<ProtectedSpan> {
        let slot = self.spans.get_mut(token.index)?;
        if slot.as_ref()?.kind != token.kind {
            return None;
        }
        slot.take()
    }

    /// Replaces every live token in `text` with the source text it stands
    /// for, releasing those spans. Unknown tokens stay as written.
    pub fn unprotect(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(at) = rest.find(Token::PREFIX) {
            out.push_str(&rest[..at]);
            rest = &rest[at..];
            match Token::parse_at(rest) {
                Some((token, len)) => {
                    match self.take(token) {
                        Some(span) => out.push_str(&span.original),
                        None => out.push_str(&rest[..len]),
                    }
                    rest = &rest[len..];
                }
                None => {
                    out.push_str(Token::PREFIX);
                    rest = &rest[Token::PREFIX.len()..];
                }
            }
        }

        out.push_str(rest);
        out
    }

    fn push(&mut self, span: ProtectedSpan) -> Token {
        let token = Token::new(span.kind, self.spans.len());
        self.spans.push(Some(span));
        token
    }
}

/// Protected text plus the arena needed to restore it.
#[derive(Debug)]
pub struct Protected {
    pub text: String,
    pub spans: ProtectedSpans,
}

/// Replaces fenced code, raw code and image elements, inline code and
/// Markdown images with tokens.
pub fn protect(source: &str, images: &dyn ImageSource) -> Protected {
    let mut spans = ProtectedSpans::new();
    let text = protect_fences(source, &mut spans);
    let text = protect_raw_elements(&text, &mut spans);
    let text = protect_raw_images(&text, &mut spans);
    let text = protect_code_spans(&text, &mut spans);
    let text = protect_markdown_images(&text, images, &mut spans);
    Protected { text, spans }
}

/// Each fence, from its opening line through its closing line, becomes a
/// single token line. An unterminated fence runs to the end of input.
fn protect_fences(source: &str, spans: &mut ProtectedSpans) -> String {
    let mut out = String::with_capacity(source.len());
    let mut lines = source.split_inclusive('\n');

    while let Some(line) = lines.next() {
        let Some((kind, info)) = CodeFence::sig(line.trim_end_matches(['\r', '\n'])) else {
            out.push_str(line);
            continue;
        };

        let mut original = line.to_string();
        let mut body = String::new();
        let mut terminator = "";
        for inner in lines.by_ref() {
            original.push_str(inner);
            let content = inner.trim_end_matches(['\r', '\n']);
            if CodeFence::closes(kind, content) {
                terminator = &inner[content.len()..];
                break;
            }
            body.push_str(inner);
        }
        // The newline before the closing fence is not part of the body.
        if body.ends_with('\n') {
            body.pop();
            if body.ends_with('\r') {
                body.pop();
            }
        }

        let token = spans.push(ProtectedSpan {
            kind: ProtectedKind::FencedCode,
            original,
            body,
            language: (!info.is_empty()).then(|| info.to_string()),
        });
        out.push_str(&token.to_string());
        out.push_str(terminator);
    }

    out
}

/// Single-backtick spans that close on the same line and are not empty.
fn protect_code_spans(text: &str, spans: &mut ProtectedSpans) -> String {
    const TICK: &str = "`";

    let mut out = String::with_capacity(text.len());
    let mut cur = Cursor::new(text);
    let mut text_start = 0;

    while cur.skip_to(TICK) {
        let start = cur.pos();
        cur.bump_n(TICK.len());
        let close = cur
            .rest()
            .find(['`', '\n'])
            .filter(|&off| cur.rest().as_bytes()[off] == b'`' && off > 0);

        let Some(off) = close else {
            continue;
        };
        cur.bump_n(off + TICK.len());

        out.push_str(cur.slice(text_start, start));
        let original = spans.unprotect(cur.slice(start, cur.pos()));
        let body = original[TICK.len()..original.len() - TICK.len()].to_string();
        let token = spans.push(ProtectedSpan {
            kind: ProtectedKind::InlineCode,
            original,
            body,
            language: None,
        });
        out.push_str(&token.to_string());
        text_start = cur.pos();
    }

    out.push_str(cur.slice(text_start, text.len()));
    out
}

/// `<pre>` elements, then `<code>` elements outside them, kept verbatim.
fn protect_raw_elements(text: &str, spans: &mut ProtectedSpans) -> String {
    static PRE_REGEX: OnceLock<Regex> = OnceLock::new();
    static CODE_REGEX: OnceLock<Regex> = OnceLock::new();
    let pre_regex = PRE_REGEX.get_or_init(|| {
        Regex::new(r"(?is)<pre\b[^>]*>.*?</pre\s*>").expect("Invalid pre regex")
    });
    let code_regex = CODE_REGEX.get_or_init(|| {
        Regex::new(r"(?is)<code\b[^>]*>.*?</code\s*>").expect("Invalid code regex")
    });

    let text = protect_verbatim(text, pre_regex, ProtectedKind::RawPre, spans);
    protect_verbatim(&text, code_regex, ProtectedKind::RawCode, spans)
}

fn protect_verbatim(
    text: &str,
    regex: &Regex,
    kind: ProtectedKind,
    spans: &mut ProtectedSpans,
) -> String {
    regex
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let element = caps[0].to_string();
            spans
                .push(ProtectedSpan {
                    kind,
                    original: element.clone(),
                    body: element,
                    language: None,
                })
                .to_string()
        })
        .into_owned()
}

fn protect_raw_images(text: &str, spans: &mut ProtectedSpans) -> String {
    static IMG_REGEX: OnceLock<Regex> = OnceLock::new();
    let img_regex =
        IMG_REGEX.get_or_init(|| Regex::new(r"(?i)<img\b[^>]*>").expect("Invalid img regex"));

    protect_verbatim(text, img_regex, ProtectedKind::RawImage, spans)
}

/// `![alt](src)` or `![alt](src "title")`.
fn protect_markdown_images(
    text: &str,
    images: &dyn ImageSource,
    spans: &mut ProtectedSpans,
) -> String {
    static MD_IMG_REGEX: OnceLock<Regex> = OnceLock::new();
    let md_img_regex = MD_IMG_REGEX.get_or_init(|| {
        Regex::new(r#"!\[([^\]]*)\]\(([^)\s]+)(?:\s+"([^"]*)")?\)"#)
            .expect("Invalid markdown image regex")
    });

    md_img_regex
        .replace_all(text, |caps: &regex::Captures<'_>| {
            // Code spans inside alt, src or title go back to their backticks.
            let original = spans.unprotect(&caps[0]);
            let Some(caps) = md_img_regex.captures(&original) else {
                return original;
            };
            let src = images.resolve(&caps[2]);
            let mut tag = format!(
                "<img src=\"{}\" alt=\"{}\"",
                html_escape::encode_double_quoted_attribute(&src),
                html_escape::encode_double_quoted_attribute(&caps[1])
            );
            if let Some(title) = caps.get(3) {
                tag.push_str(&format!(
                    " title=\"{}\"",
                    html_escape::encode_double_quoted_attribute(title.as_str())
                ));
            }
            tag.push('>');
            spans
                .push(ProtectedSpan {
                    kind: ProtectedKind::RawImage,
                    original: caps[0].to_string(),
                    body: tag,
                    language: None,
                })
                .to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::UnchangedImages;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn protect(source: &str) -> Protected {
        super::protect(source, &UnchangedImages)
    }

    #[test]
    fn fence_becomes_single_token_line() {
        let p = protect("before\n```rust\nlet x = `y`;\n```\nafter");
        assert_eq!(p.text, "before\n__PROTECTED_CODEBLOCK_0__\nafter");
        let span = p.spans.get(Token::new(ProtectedKind::FencedCode, 0)).unwrap();
        assert_eq!(span.body, "let x = `y`;");
        assert_eq!(span.language.as_deref(), Some("rust"));
        assert_eq!(span.original, "```rust\nlet x = `y`;\n```\n");
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let p = protect("```\n# not a heading\n| a |");
        assert_eq!(p.text, "__PROTECTED_CODEBLOCK_0__");
        let span = p.spans.get(Token::new(ProtectedKind::FencedCode, 0)).unwrap();
        assert_eq!(span.body, "# not a heading\n| a |");
    }

    #[test]
    fn tilde_fence_is_not_closed_by_backticks() {
        let p = protect("~~~\n```\n~~~\n");
        assert_eq!(p.text, "__PROTECTED_CODEBLOCK_0__\n");
        let span = p.spans.get(Token::new(ProtectedKind::FencedCode, 0)).unwrap();
        assert_eq!(span.body, "```");
    }

    #[test]
    fn inline_code_spans() {
        let p = protect("use `a*b*` and `c`");
        assert_eq!(p.text, "use __PROTECTED_CODE_0__ and __PROTECTED_CODE_1__");
        assert_eq!(
            p.spans
                .get(Token::new(ProtectedKind::InlineCode, 0))
                .unwrap()
                .body,
            "a*b*"
        );
    }

    #[test]
    fn unclosed_or_empty_code_span_is_left_alone() {
        assert_eq!(protect("a `b\nc` d").text, "a `b\nc` d");
        assert_eq!(protect("empty `` ticks").text, "empty `` ticks");
    }

    #[test]
    fn img_tag_inside_code_span_stays_code() {
        let p = protect(r#"<IMG src="a_*b*.png"> and `<img>`"#);
        assert_eq!(p.text, "__PROTECTED_IMAGE_0__ and __PROTECTED_CODE_2__");
        assert_eq!(
            p.spans
                .get(Token::new(ProtectedKind::RawImage, 0))
                .unwrap()
                .body,
            r#"<IMG src="a_*b*.png">"#
        );
        let code = p.spans.get(Token::new(ProtectedKind::InlineCode, 2)).unwrap();
        assert_eq!(code.body, "<img>");
        assert_eq!(code.original, "`<img>`");
        assert!(p.spans.get(Token::new(ProtectedKind::RawImage, 1)).is_none());
    }

    #[test]
    fn backticks_in_img_tag_are_not_code() {
        let p = protect(r#"<img src="a.png" alt="`x`"> and `y`"#);
        assert_eq!(p.text, "__PROTECTED_IMAGE_0__ and __PROTECTED_CODE_1__");
        let span = p.spans.get(Token::new(ProtectedKind::RawImage, 0)).unwrap();
        assert_eq!(span.body, r#"<img src="a.png" alt="`x`">"#);
    }

    #[test]
    fn code_span_in_markdown_image_alt_is_kept_as_text() {
        let p = protect("See ![use `x`](a.png) here");
        assert_eq!(p.text, "See __PROTECTED_IMAGE_1__ here");
        let span = p.spans.get(Token::new(ProtectedKind::RawImage, 1)).unwrap();
        assert_eq!(span.body, r#"<img src="a.png" alt="use `x`">"#);
        assert_eq!(span.original, "![use `x`](a.png)");
        assert!(p.spans.get(Token::new(ProtectedKind::InlineCode, 0)).is_none());
    }

    #[rstest]
    #[case(
        r#"<pre><code class="language-rust">let s = `y` &amp;&amp; z;</code></pre>"#,
        ProtectedKind::RawPre
    )]
    #[case("<PRE>\n`a`\n</PRE >", ProtectedKind::RawPre)]
    #[case("<code>`a` &lt;b&gt;</code>", ProtectedKind::RawCode)]
    fn existing_code_elements_are_kept_verbatim(
        #[case] element: &str,
        #[case] kind: ProtectedKind,
    ) {
        let p = protect(&format!("x {element} `y`"));
        assert_eq!(p.text, format!("x {} __PROTECTED_CODE_1__", Token::new(kind, 0)));
        let span = p.spans.get(Token::new(kind, 0)).unwrap();
        assert_eq!(span.body, element);
        assert_eq!(span.original, element);
    }

    #[test]
    fn unprotect_puts_back_live_tokens_only() {
        let mut p = protect("`a` and `b`");
        let text = "[__PROTECTED_CODE_0__] __PROTECTED_CODE_9__ __PROTECTED_x";
        assert_eq!(
            p.spans.unprotect(text),
            "[`a`] __PROTECTED_CODE_9__ __PROTECTED_x"
        );
        assert_eq!(
            p.spans.unprotect("__PROTECTED_CODE_0__ __PROTECTED_CODE_1__"),
            "__PROTECTED_CODE_0__ `b`"
        );
    }

    #[test]
    fn markdown_images_are_rendered_through_image_source() {
        let cdn = |src: &str| format!("/media/{src}");
        let p = super::protect(r#"see ![a *b*](x_1.png "T") here"#, &cdn);
        assert_eq!(p.text, "see __PROTECTED_IMAGE_0__ here");
        let span = p.spans.get(Token::new(ProtectedKind::RawImage, 0)).unwrap();
        assert_eq!(span.body, r#"<img src="/media/x_1.png" alt="a *b*" title="T">"#);
        assert_eq!(span.original, r#"![a *b*](x_1.png "T")"#);
    }

    #[test]
    fn take_consumes_once_and_checks_kind() {
        let mut p = protect("`x`");
        assert!(p.spans.take(Token::new(ProtectedKind::RawImage, 0)).is_none());
        assert!(p.spans.take(Token::new(ProtectedKind::InlineCode, 0)).is_some());
        assert!(p.spans.take(Token::new(ProtectedKind::InlineCode, 0)).is_none());
        assert!(p.spans.take(Token::new(ProtectedKind::InlineCode, 9)).is_none());
    }
}
