//! Insertion-ordered map keyed by stack items.

use crate::stack_item::StackItem;
use bytes::Bytes;
use indexmap::IndexMap;
use indexmap::map::Iter;
use std::hash::{Hash, Hasher};

/// Key/value pairs of a `Map` stack item, kept in the order they were decoded.
///
/// Two maps are equal when they hold equal pairs in the same order.
#[derive(Debug, Clone, Default)]
pub struct StackMap(IndexMap<StackItem, StackItem>);

impl StackMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair, returning the previous value for an equal key.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: StackItem, value: StackItem) -> Option<StackItem> {
        self.0.insert(key, value)
    }

    pub fn get(&self, key: &StackItem) -> Option<&StackItem> {
        self.0.get(key)
    }

    /// Looks up a `ByteString` key holding exactly `key`.
    pub fn get_by_bytes(&self, key: &[u8]) -> Option<&StackItem> {
        self.get(&StackItem::ByteString(Some(Bytes::copy_from_slice(key))))
    }

    /// Looks up a `ByteString` key holding the UTF-8 bytes of `key`.
    pub fn get_by_str(&self, key: &str) -> Option<&StackItem> {
        self.get_by_bytes(key.as_bytes())
    }

    pub fn contains_key(&self, key: &StackItem) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, StackItem, StackItem> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &StackItem> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &StackItem> {
        self.0.values()
    }
}

impl PartialEq for StackMap {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl Eq for StackMap {}

impl Hash for StackMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0.len());
        for (key, value) in &self.0 {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl FromIterator<(StackItem, StackItem)> for StackMap {
    fn from_iter<I: IntoIterator<Item = (StackItem, StackItem)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StackMap {
    type Item = (&'a StackItem, &'a StackItem);
    type IntoIter = Iter<'a, StackItem, StackItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
