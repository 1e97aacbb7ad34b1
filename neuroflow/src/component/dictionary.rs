use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::error::{CacheKind, Error};
use crate::ports::Value;

/// A named collection of values cached by a component.
///
/// Each component owns three dictionaries: its inputs, its states and its
/// results. Looking up a missing key is an error rather than a silent
/// default.
#[derive(Clone, Debug, PartialEq)]
pub struct Dictionary {
    kind: CacheKind,
    entries: BTreeMap<String, Value>,
}

impl Dictionary {
    /// Creates an empty dictionary of the specified kind.
    pub fn new(kind: CacheKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Returns the kind of cache this dictionary implements.
    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    /// Returns a reference to the value stored under the key.
    pub fn get(&self, key: &str) -> Result<&Value, Error> {
        self.entries.get(key).ok_or_else(|| Error::MissingKey {
            cache: self.kind,
            key: key.to_owned(),
        })
    }

    /// Returns a mutable reference to the value stored under the key.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value, Error> {
        let kind = self.kind;
        self.entries.get_mut(key).ok_or_else(|| Error::MissingKey {
            cache: kind,
            key: key.to_owned(),
        })
    }

    /// Stores a value under the key, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Removes and returns the value stored under the key.
    pub fn remove(&mut self, key: &str) -> Result<Value, Error> {
        self.entries.remove(key).ok_or_else(|| Error::MissingKey {
            cache: self.kind,
            key: key.to_owned(),
        })
    }

    /// Returns `true` if a value is stored under the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no value is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all values.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over the key-value pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.entries.keys()
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
