//! Key to values grouping
//!
//! Keys keep the order in which they were first seen and the values under a
//! key keep their encounter order, so a run over the same inputs in the same
//! job order always produces the same result.

use super::pair::Pair;
use std::collections::HashMap;
use std::hash::Hash;

/// Every value seen in a run, grouped under its key
#[derive(Debug, Clone)]
pub struct GroupedResult<K, V> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Vec<V>)>,
}

impl<K, V> Default for GroupedResult<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }
}

// The index is derived from `groups`, so equality only looks at the groups.
impl<K: PartialEq, V: PartialEq> PartialEq for GroupedResult<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl<K: Eq, V: Eq> Eq for GroupedResult<K, V> {}

impl<K, V> GroupedResult<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Group an arbitrary pair sequence by key
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = Pair<K, V>>,
    {
        let mut grouped = Self::new();
        for pair in pairs {
            let (key, value) = pair.into_parts();
            grouped.push(key, value);
        }
        grouped
    }

    /// Append one value under its key
    pub fn push(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].1.push(value),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![value]));
            }
        }
    }

    /// Append every group of `other` after the values already held
    pub fn merge(&mut self, other: GroupedResult<K, V>) {
        for (key, values) in other.groups {
            match self.index.get(&key) {
                Some(&slot) => self.groups[slot].1.extend(values),
                None => {
                    self.index.insert(key.clone(), self.groups.len());
                    self.groups.push((key, values));
                }
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.index
            .get(key)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    /// Number of values grouped under `key`, zero when absent
    pub fn count(&self, key: &K) -> usize {
        self.get(key).map_or(0, <[V]>::len)
    }
}

impl<K, V> GroupedResult<K, V> {
    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of values across all keys
    pub fn total_values(&self) -> usize {
        self.groups.iter().map(|(_, values)| values.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.groups
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|(key, _)| key)
    }

    /// Key and group size, in key order
    pub fn counts(&self) -> impl Iterator<Item = (&K, usize)> {
        self.groups.iter().map(|(key, values)| (key, values.len()))
    }

    pub fn into_pairs(self) -> Vec<Pair<K, Vec<V>>> {
        self.groups
            .into_iter()
            .map(|(key, values)| Pair::new(key, values))
            .collect()
    }
}

impl<K, V> FromIterator<Pair<K, V>> for GroupedResult<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = Pair<K, V>>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K, V> IntoIterator for GroupedResult<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = std::vec::IntoIter<(K, Vec<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}
