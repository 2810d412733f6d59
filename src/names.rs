//! Unique name sets and name collection from query text

use crate::error::*;
use crate::lexer::{tokenize, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Deref;

/// GraphQL keywords that are always part of a collected name set
pub const RESERVED_NAMES: [&str; 7] = [
    "query",
    "mutation",
    "subscription",
    "fragment",
    "on",
    "true",
    "false",
];

/// Deduplicated, lexicographically sorted sequence of names
///
/// Serializes as a plain JSON array. Deserializing sorts and deduplicates,
/// so a stored baseline always reloads in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct NameSet(Vec<String>);

impl NameSet {
    /// Build a set from arbitrary names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        NameSet(unique.into_iter().collect())
    }

    /// Build a set from `names` plus the reserved keywords
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reserved = RESERVED_NAMES.iter().map(|n| n.to_string());
        Self::from_names(reserved.chain(names.into_iter().map(Into::into)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for NameSet {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for NameSet {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}

impl From<NameSet> for Vec<String> {
    fn from(set: NameSet) -> Self {
        set.0
    }
}

/// Collect every name in a query plus the reserved keywords
pub fn names_from_query(input: &str) -> Result<NameSet> {
    let names = used_names(input)?;
    tracing::trace!(count = names.len(), "collected names from query");
    Ok(NameSet::with_reserved(names.into_vec()))
}

/// Names that actually occur as Name tokens in `input`
pub(crate) fn used_names(input: &str) -> Result<NameSet> {
    let mut names = BTreeSet::new();
    for token in tokenize(input) {
        let token = token?;
        if token.kind == TokenKind::Name {
            names.insert(token.text);
        }
    }
    Ok(NameSet::from_names(names))
}
