use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// One independently toggleable feature of a resource, e.g. a log type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityToken(pub String);

impl CapabilityToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CapabilityToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CapabilityToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unordered, deduplicated set of tokens.
///
/// Backed by a `BTreeSet` so iteration (and therefore every log line and JSON
/// array built from a set) is sorted and stable. Comparison is case-sensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<CapabilityToken>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<CapabilityToken>) -> bool {
        self.0.insert(token.into())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityToken> {
        self.0.iter()
    }

    /// Tokens in `self` that are not in `other`.
    pub fn difference(&self, other: &CapabilitySet) -> CapabilitySet {
        self.0.difference(&other.0).cloned().collect()
    }

    pub fn union(&self, other: &CapabilitySet) -> CapabilitySet {
        self.0.union(&other.0).cloned().collect()
    }

    /// Sorted token strings, mostly for log and JSON output.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().map(|t| t.0.clone()).collect()
    }

    /// Comma separated, sorted.
    pub fn joined(&self) -> String {
        self.to_vec().join(", ")
    }
}

impl<T: Into<CapabilityToken>> FromIterator<T> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a CapabilityToken;
    type IntoIter = std::collections::btree_set::Iter<'a, CapabilityToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
