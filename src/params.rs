//! Path parameters extracted from a matched pathname

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters captured while matching a pathname against the route table.
///
/// Inserting an existing name overwrites the previous value, which is how the
/// matcher gives later-scanned routes precedence when parameter names collide.
/// Host adapters attaching parameters to a request object use
/// [`Params::fill_missing`] instead, where values already present win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params(HashMap<String, String>);

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, overwriting any previous value of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns true if no parameters were captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if a parameter of this name was captured.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Absorb `other`, inserting only names not already present.
    ///
    /// Existing values take precedence, supporting nested-router re-entry
    /// where a request object already carries parameters from an outer match.
    pub fn fill_missing(&mut self, other: Params) {
        for (name, value) in other.0 {
            self.0.entry(name).or_insert(value);
        }
    }

    /// Iterate over captured `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::collections::hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
