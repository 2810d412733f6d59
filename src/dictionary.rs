//! Name <-> code dictionary

use crate::alphabet::Alphabet;
use std::collections::BTreeMap;

/// Bijective mapping between names and fixed-width codes
///
/// The code for the name at position `i` is `i` written in the alphabet's
/// base, padded to the dictionary width. The same name sequence always
/// yields the same dictionary, which is what lets minify and expand agree
/// without sharing anything but the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    width: usize,
    codes: BTreeMap<String, String>,
    names: BTreeMap<String, String>,
}

impl Dictionary {
    /// Build a dictionary with the default alphabet
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self::with_alphabet(names, &Alphabet::default())
    }

    /// Build a dictionary over `names` in the given order
    ///
    /// A repeated name keeps the code of its first position; the codes of
    /// later positions still decode to it.
    pub fn with_alphabet<S: AsRef<str>>(names: &[S], alphabet: &Alphabet) -> Self {
        let width = alphabet.code_width(names.len());
        let mut codes = BTreeMap::new();
        let mut by_code = BTreeMap::new();

        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let code = alphabet.encode(i, width);
            codes.entry(name.to_string()).or_insert_with(|| code.clone());
            by_code.insert(code, name.to_string());
        }

        Self {
            width,
            codes,
            names: by_code,
        }
    }

    /// Fixed code width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Code assigned to `name`
    pub fn code(&self, name: &str) -> Option<&str> {
        self.codes.get(name).map(String::as_str)
    }

    /// Name behind `code`
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// `(name, code)` pairs ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.codes.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    /// Code -> name view, ordered by code
    pub fn inverse(&self) -> &BTreeMap<String, String> {
        &self.names
    }
}
