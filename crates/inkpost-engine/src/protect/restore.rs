use super::{ProtectedKind, ProtectedSpan, ProtectedSpans, Token};

/// Replaces every token in `fragment` with its protected content.
///
/// Code is HTML-escaped (`&`, `<`, `>` only) and wrapped; images are put
/// back as their `<img>` tag, which for raw tags is the source verbatim.
/// Malformed, unknown or already consumed tokens stay in place as literal
/// text.
pub fn restore(fragment: &str, mut spans: ProtectedSpans) -> String {
    if spans.is_empty() {
        return fragment.to_string();
    }

    let mut out = String::with_capacity(fragment.len());
    let mut rest = fragment;

    while let Some(at) = rest.find(Token::PREFIX) {
        out.push_str(&rest[..at]);
        rest = &rest[at..];

        match Token::parse_at(rest) {
            Some((token, len)) => {
                match spans.take(token) {
                    Some(span) => out.push_str(&render(&span)),
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

fn render(span: &ProtectedSpan) -> String {
    match span.kind {
        ProtectedKind::FencedCode => {
            let body = html_escape::encode_text(&span.body);
            match &span.language {
                Some(lang) => format!(
                    "<pre><code class=\"language-{}\">{body}</code></pre>",
                    html_escape::encode_double_quoted_attribute(lang)
                ),
                None => format!("<pre><code>{body}</code></pre>"),
            }
        }
        ProtectedKind::InlineCode => {
            format!("<code>{}</code>", html_escape::encode_text(&span.body))
        }
        ProtectedKind::RawImage | ProtectedKind::RawPre | ProtectedKind::RawCode => {
            span.body.clone()
        }
    }
}
