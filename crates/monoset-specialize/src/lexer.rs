//! Lossless tokenizer for Rust source
//!
//! Splits source text into tokens that cover every byte, so untouched tokens
//! can be written back unchanged. Only the distinctions the specializer needs
//! are made: identifiers, lifetimes, literals, comments, whitespace and
//! punctuation (`::` is the only multi-character punctuation token).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    LineComment,
    BlockComment,
    Ident,
    Lifetime,
    Literal,
    Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Whitespace and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {offset}")]
pub struct LexError {
    pub offset: usize,
    pub message: String,
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

/// Tokenize `source`. Fails on unterminated literals and comments.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    while lexer.pos < lexer.bytes.len() {
        let start = lexer.pos;
        let kind = lexer.next_kind()?;
        tokens.push(Token {
            kind,
            start,
            end: lexer.pos,
        });
    }
    Ok(tokens)
}

impl<'a> Lexer<'a> {
    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn error(&self, start: usize, message: &str) -> LexError {
        LexError {
            offset: start,
            message: message.to_string(),
        }
    }

    fn next_kind(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        let c = match self.current_char() {
            Some(c) => c,
            None => return Err(self.error(start, "unexpected end of input")),
        };

        if c.is_whitespace() {
            while let Some(c) = self.current_char() {
                if !c.is_whitespace() {
                    break;
                }
                self.pos += c.len_utf8();
            }
            return Ok(TokenKind::Whitespace);
        }

        match (self.peek(0), self.peek(1)) {
            (Some(b'/'), Some(b'/')) => {
                while let Some(b) = self.peek(0) {
                    if b == b'\n' {
                        break;
                    }
                    self.pos += 1;
                }
                return Ok(TokenKind::LineComment);
            }
            (Some(b'/'), Some(b'*')) => {
                self.block_comment(start)?;
                return Ok(TokenKind::BlockComment);
            }
            _ => {}
        }

        if let Some(kind) = self.prefixed_literal(start)? {
            return Ok(kind);
        }

        if c == '"' {
            self.pos += 1;
            self.quoted(start, b'"')?;
            return Ok(TokenKind::Literal);
        }

        if c == '\'' {
            return self.quote_or_lifetime(start);
        }

        if c.is_alphabetic() || c == '_' {
            self.ident();
            return Ok(TokenKind::Ident);
        }

        if c.is_ascii_digit() {
            self.number();
            return Ok(TokenKind::Literal);
        }

        if c == ':' && self.peek(1) == Some(b':') {
            self.pos += 2;
        } else {
            self.pos += c.len_utf8();
        }
        Ok(TokenKind::Punct)
    }

    fn block_comment(&mut self, start: usize) -> Result<(), LexError> {
        let mut depth = 0usize;
        while self.pos < self.bytes.len() {
            match (self.peek(0), self.peek(1)) {
                (Some(b'/'), Some(b'*')) => {
                    depth += 1;
                    self.pos += 2;
                }
                (Some(b'*'), Some(b'/')) => {
                    depth -= 1;
                    self.pos += 2;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => self.pos += 1,
            }
        }
        Err(self.error(start, "unterminated block comment"))
    }

    /// Raw strings, byte strings, byte chars and raw identifiers.
    fn prefixed_literal(&mut self, start: usize) -> Result<Option<TokenKind>, LexError> {
        let (prefix_len, raw) = match (self.peek(0), self.peek(1), self.peek(2)) {
            (Some(b'b'), Some(b'r'), Some(b'"' | b'#')) => (2, true),
            (Some(b'r'), Some(b'"'), _) => (1, true),
            (Some(b'r'), Some(b'#'), Some(b'"' | b'#')) => (1, true),
            (Some(b'r'), Some(b'#'), Some(_)) => {
                // raw identifier r#name
                self.pos += 2;
                self.ident();
                return Ok(Some(TokenKind::Ident));
            }
            (Some(b'b'), Some(b'"'), _) => (1, false),
            (Some(b'b'), Some(b'\''), _) => {
                self.pos += 2;
                self.quoted(start, b'\'')?;
                return Ok(Some(TokenKind::Literal));
            }
            _ => return Ok(None),
        };

        self.pos += prefix_len;
        if !raw {
            self.pos += 1;
            self.quoted(start, b'"')?;
            return Ok(Some(TokenKind::Literal));
        }

        let mut hashes = 0usize;
        while self.peek(0) == Some(b'#') {
            hashes += 1;
            self.pos += 1;
        }
        if self.peek(0) != Some(b'"') {
            return Err(self.error(start, "malformed raw string"));
        }
        self.pos += 1;
        loop {
            match self.peek(0) {
                None => return Err(self.error(start, "unterminated raw string")),
                Some(b'"') => {
                    self.pos += 1;
                    let closing = (0..hashes).all(|i| self.peek(i) == Some(b'#'));
                    if closing {
                        self.pos += hashes;
                        return Ok(Some(TokenKind::Literal));
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Scan to the unescaped `close` byte; the opening quote is consumed.
    fn quoted(&mut self, start: usize, close: u8) -> Result<(), LexError> {
        loop {
            match self.peek(0) {
                None => return Err(self.error(start, "unterminated literal")),
                Some(b'\\') => self.pos += 2,
                Some(b) if b == close => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn quote_or_lifetime(&mut self, start: usize) -> Result<TokenKind, LexError> {
        self.pos += 1;
        if self.peek(0) == Some(b'\\') {
            self.quoted(start, b'\'')?;
            return Ok(TokenKind::Literal);
        }
        let c = match self.current_char() {
            Some(c) => c,
            None => return Err(self.error(start, "unterminated character literal")),
        };
        if self.source[self.pos + c.len_utf8()..].starts_with('\'') {
            self.pos += c.len_utf8() + 1;
            return Ok(TokenKind::Literal);
        }
        if c.is_alphabetic() || c == '_' {
            self.ident();
            return Ok(TokenKind::Lifetime);
        }
        Err(self.error(start, "malformed character literal"))
    }

    fn ident(&mut self) {
        while let Some(c) = self.current_char() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn number(&mut self) {
        while let Some(b) = self.peek(0) {
            let fractional_dot =
                b == b'.' && self.peek(1).map(|n| n.is_ascii_digit()).unwrap_or(false);
            if b.is_ascii_alphanumeric() || b == b'_' || fractional_dot {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_texts(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .filter(|t| !t.is_trivia())
            .map(|t| (t.kind, t.text(source)))
            .collect()
    }

    #[test]
    fn test_tokens_cover_source() {
        let source = "impl<E: Element> ArrayList<E> { fn f(&self) -> &'static str { \"x\" } }";
        let tokens = tokenize(source).unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.text(source)).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_path_separator_is_one_token() {
        let toks = kinds_and_texts("std::collections::HashMap");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Ident, "std"),
                (TokenKind::Punct, "::"),
                (TokenKind::Ident, "collections"),
                (TokenKind::Punct, "::"),
                (TokenKind::Ident, "HashMap"),
            ]
        );
    }

    #[test]
    fn test_lifetimes_and_chars() {
        let toks = kinds_and_texts("'a 'x' '\\n' b'q'");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Lifetime, "'a"),
                (TokenKind::Literal, "'x'"),
                (TokenKind::Literal, "'\\n'"),
                (TokenKind::Literal, "b'q'"),
            ]
        );
    }

    #[test]
    fn test_strings_hide_identifiers() {
        let toks = kinds_and_texts(r####"let s = r#"ArrayList<E> "quoted""#;"####);
        assert!(toks.contains(&(TokenKind::Literal, r###"r#"ArrayList<E> "quoted""#"###)));
        assert!(!toks.iter().any(|(_, text)| *text == "ArrayList"));
    }

    #[test]
    fn test_nested_block_comment() {
        let toks = tokenize("/* outer /* inner */ still */ x").unwrap();
        assert_eq!(toks[0].kind, TokenKind::BlockComment);
        assert_eq!(toks.len(), 3);
    }

    #[test]
    fn test_numbers_and_ranges() {
        let toks = kinds_and_texts("0..10 1.5f32 0xff_u8");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Literal, "0"),
                (TokenKind::Punct, "."),
                (TokenKind::Punct, "."),
                (TokenKind::Literal, "10"),
                (TokenKind::Literal, "1.5f32"),
                (TokenKind::Literal, "0xff_u8"),
            ]
        );
    }

    #[test]
    fn test_unterminated_literal_is_an_error() {
        assert!(tokenize("let s = \"open").is_err());
        assert!(tokenize("/* open").is_err());
    }
}
