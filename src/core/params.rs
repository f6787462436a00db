use super::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Reserved key holding the window offset.
pub const SKIP: &str = "skip";
/// Reserved key holding the window size.
pub const TAKE: &str = "take";

/// Filter, sort and window criteria sent with every `list` request.
///
/// Keys other than `skip` and `take` are opaque to the collection and are
/// passed to the provider verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    entries: BTreeMap<String, Value>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Entries that are not part of the `skip`/`take` window.
    pub fn criteria(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries
            .iter()
            .filter(|(key, _)| key.as_str() != SKIP && key.as_str() != TAKE)
    }

    /// Copies every entry of `other` into `self`, overriding shared keys.
    pub fn merge(&mut self, other: QueryParams) {
        self.entries.extend(other.entries);
    }

    pub fn skip(&self) -> Option<usize> {
        self.get(SKIP).and_then(Value::as_count)
    }

    pub fn take(&self) -> Option<usize> {
        self.get(TAKE).and_then(Value::as_count)
    }

    pub fn set_skip(&mut self, skip: usize) {
        self.insert(SKIP, skip);
    }

    pub fn set_take(&mut self, take: usize) {
        self.insert(TAKE, take);
    }

    /// Sets `take` to `default` when it is missing, unparsable or zero.
    pub fn default_take(&mut self, default: usize) {
        if matches!(self.take(), None | Some(0)) {
            self.set_take(default);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
