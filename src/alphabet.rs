//! Code alphabet
//!
//! Codes are written into the coded body where the tokenizer must read a
//! run of them as a single GraphQL name. Every symbol therefore has to sit
//! inside the name-continue class `[_0-9A-Za-z]`, and the first symbol of a
//! code has to be a name-start character so it never lexes as a number.

use crate::error::*;

/// Default symbols: lowercase, uppercase, digits, underscore
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Ordered set of code symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    /// Length of the name-start prefix of `symbols`
    leading: usize,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::from_symbols(DEFAULT_ALPHABET.chars().collect())
    }
}

impl Alphabet {
    /// Build an alphabet, checking that codes drawn from it always lex as
    /// one GraphQL name
    pub fn new(symbols: &str) -> Result<Self> {
        let chars: Vec<char> = symbols.chars().collect();

        if chars.len() < 2 {
            return Err(CodecError::InvalidAlphabet(format!(
                "need at least 2 symbols, got {}",
                chars.len()
            )));
        }

        if let Some(c) = chars.iter().find(|c| !is_name_continue(**c)) {
            return Err(CodecError::InvalidAlphabet(format!(
                "symbol {c:?} is not a GraphQL name character"
            )));
        }

        for (i, c) in chars.iter().enumerate() {
            if chars[..i].contains(c) {
                return Err(CodecError::InvalidAlphabet(format!("duplicate symbol {c:?}")));
            }
        }

        if !is_name_start(chars[0]) {
            return Err(CodecError::InvalidAlphabet(format!(
                "zero symbol {:?} cannot start a GraphQL name",
                chars[0]
            )));
        }

        Ok(Self::from_symbols(chars))
    }

    fn from_symbols(symbols: Vec<char>) -> Self {
        let leading = symbols.iter().take_while(|c| is_name_start(**c)).count();
        Self { symbols, leading }
    }

    /// Number of symbols (the numeric base of codes)
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// The padding symbol, digit value zero
    pub fn zero(&self) -> char {
        self.symbols[0]
    }

    /// Smallest code width (at least 1) that gives `count` distinct codes
    /// whose first symbol is a name-start character
    ///
    /// Not wire-compatible with the legacy `base^width >= count` encoder for
    /// sets of 53 to 62 names: those get two-symbol codes here, one there.
    pub fn code_width(&self, count: usize) -> usize {
        let mut width = 1;
        let mut capacity = self.leading;
        while capacity < count {
            width += 1;
            capacity = capacity.saturating_mul(self.len());
        }
        width
    }

    /// Base-N representation of `index`, left-padded with the zero symbol
    pub fn encode(&self, index: usize, width: usize) -> String {
        let base = self.len();
        let mut digits = vec![self.zero(); width];
        let mut remainder = index;
        for slot in digits.iter_mut().rev() {
            if remainder == 0 {
                break;
            }
            *slot = self.symbols[remainder % base];
            remainder /= base;
        }
        digits.into_iter().collect()
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
