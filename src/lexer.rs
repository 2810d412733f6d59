//! Token source over `apollo_parser::Lexer`
//!
//! Classifies raw lexer output into the handful of token kinds the codec
//! cares about. Whitespace and commas are GraphQL ignored tokens and are
//! never yielded; iteration stops at end of input.

use crate::error::*;
use apollo_parser::{Lexer, TokenKind as LexKind};

/// Token classification used by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier (field, type, argument, keyword, enum value...)
    Name,
    /// Quoted string literal
    String,
    /// Triple-quoted block string literal
    BlockString,
    /// `#` comment up to end of line
    Comment,
    /// Int or Float literal
    Number,
    /// Any punctuator: `{ } ( ) [ ] : ! $ @ = | & ...`
    Punctuator,
}

/// A classified token borrowing its text from the source
///
/// For string kinds `text` includes the quotes and the escape sequences
/// exactly as written, so re-emitting it reproduces the same literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str) -> Self {
        Self { kind, text }
    }

    /// Whether a token of this kind could merge with a neighbouring
    /// identifier or number if printed without a gap
    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Name | TokenKind::Number)
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, TokenKind::String | TokenKind::BlockString)
    }
}

/// Lazy token iterator over a GraphQL source text
pub struct Tokens<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    offset: usize,
    done: bool,
}

/// Tokenize `source`
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens {
        source,
        lexer: Lexer::new(source),
        offset: 0,
        done: false,
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let raw = match self.lexer.next() {
                Some(Ok(raw)) => raw,
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };

            // The lexer is lossless, so token lengths add up to the offset
            let start = self.offset;
            self.offset += raw.data().len();

            let kind = match raw.kind() {
                LexKind::Whitespace | LexKind::Comma => continue,
                LexKind::Eof => {
                    self.done = true;
                    return None;
                }
                LexKind::Name => TokenKind::Name,
                LexKind::Comment => TokenKind::Comment,
                LexKind::Int | LexKind::Float => TokenKind::Number,
                LexKind::StringValue => {
                    if raw.data().starts_with("\"\"\"") {
                        TokenKind::BlockString
                    } else {
                        TokenKind::String
                    }
                }
                _ => TokenKind::Punctuator,
            };

            let text = &self.source[start..self.offset];
            return Some(Ok(Token::new(kind, text)));
        }
        None
    }
}

/// Whether printing `next` directly after `prev` would change how the
/// output lexes. Adjacent names are not covered here: the minifier
/// concatenates codes on purpose and the expander always spaces names.
pub(crate) fn needs_gap(prev: &Token<'_>, next: &Token<'_>) -> bool {
    match (prev.kind, next.kind) {
        (TokenKind::Name, TokenKind::Name) => false,
        _ if prev.is_word() && next.is_word() => true,
        _ if prev.is_string() && next.is_string() => true,
        (TokenKind::Number, TokenKind::Punctuator) => next.text.starts_with('.'),
        _ => false,
    }
}
