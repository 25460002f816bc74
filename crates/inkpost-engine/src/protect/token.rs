use std::fmt;

/// What a placeholder token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedKind {
    FencedCode,
    InlineCode,
    RawImage,
    /// A `<pre>` element already present in the input, kept verbatim.
    RawPre,
    /// A `<code>` element already present in the input, kept verbatim.
    RawCode,
}

impl ProtectedKind {
    /// The `<KIND>` part of the token.
    pub fn tag(self) -> &'static str {
        match self {
            ProtectedKind::FencedCode => "CODEBLOCK",
            ProtectedKind::InlineCode => "CODE",
            ProtectedKind::RawImage => "IMAGE",
            ProtectedKind::RawPre => "PRE",
            ProtectedKind::RawCode => "HTMLCODE",
        }
    }

    /// Kinds whose token, alone on a line, stands for a whole block.
    pub fn is_block(self) -> bool {
        matches!(self, ProtectedKind::FencedCode | ProtectedKind::RawPre)
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "CODEBLOCK" => Some(ProtectedKind::FencedCode),
            "CODE" => Some(ProtectedKind::InlineCode),
            "IMAGE" => Some(ProtectedKind::RawImage),
            "PRE" => Some(ProtectedKind::RawPre),
            "HTMLCODE" => Some(ProtectedKind::RawCode),
            _ => None,
        }
    }
}

/// A placeholder of the form `__PROTECTED_<KIND>_<N>__`, where `N` is the
/// arena index of the protected span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: ProtectedKind,
    pub index: usize,
}

impl Token {
    pub const PREFIX: &'static str = "__PROTECTED_";
    pub const SUFFIX: &'static str = "__";

    pub fn new(kind: ProtectedKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Parses a token at the start of `s`, returning it with its byte length.
    pub fn parse_at(s: &str) -> Option<(Token, usize)> {
        let rest = s.strip_prefix(Self::PREFIX)?;
        let tag_len = rest.bytes().take_while(u8::is_ascii_uppercase).count();
        let kind = ProtectedKind::from_tag(&rest[..tag_len])?;
        let rest = rest[tag_len..].strip_prefix('_')?;
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let index = rest[..digits].parse().ok()?;
        rest[digits..].strip_prefix(Self::SUFFIX)?;
        let len = Self::PREFIX.len() + tag_len + 1 + digits + Self::SUFFIX.len();
        Some((Token { kind, index }, len))
    }

    /// Parses `s` only if it is exactly one token.
    pub fn parse_exact(s: &str) -> Option<Token> {
        match Self::parse_at(s) {
            Some((token, len)) if len == s.len() => Some(token),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}_{}{}",
            Self::PREFIX,
            self.kind.tag(),
            self.index,
            Self::SUFFIX
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ProtectedKind::FencedCode, 0, "__PROTECTED_CODEBLOCK_0__")]
    #[case(ProtectedKind::InlineCode, 12, "__PROTECTED_CODE_12__")]
    #[case(ProtectedKind::RawImage, 3, "__PROTECTED_IMAGE_3__")]
    #[case(ProtectedKind::RawPre, 4, "__PROTECTED_PRE_4__")]
    #[case(ProtectedKind::RawCode, 5, "__PROTECTED_HTMLCODE_5__")]
    fn display_and_parse_agree(
        #[case] kind: ProtectedKind,
        #[case] index: usize,
        #[case] text: &str,
    ) {
        let token = Token::new(kind, index);
        assert_eq!(token.to_string(), text);
        assert_eq!(Token::parse_exact(text), Some(token));
    }

    #[test]
    fn parse_at_reports_length_with_trailing_text() {
        let (token, len) = Token::parse_at("__PROTECTED_CODE_7__ tail").unwrap();
        assert_eq!(token, Token::new(ProtectedKind::InlineCode, 7));
        assert_eq!(len, "__PROTECTED_CODE_7__".len());
    }

    #[rstest]
    #[case("__PROTECTED_")]
    #[case("__PROTECTED_TABLE_1__")]
    #[case("__PROTECTED_CODE___")]
    #[case("__PROTECTED_CODE_1_")]
    #[case("__protected_code_1__")]
    fn malformed_tokens(#[case] text: &str) {
        assert_eq!(Token::parse_at(text), None);
    }

    #[test]
    fn parse_exact_rejects_suffix() {
        assert_eq!(Token::parse_exact("__PROTECTED_CODE_1__x"), None);
    }
}
