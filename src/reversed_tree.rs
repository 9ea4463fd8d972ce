//! `ReversedTree` (spec.md §4.5, L7): wraps a radix tree, reversing keys on
//! ingress and egress so that prefix queries over the internal tree answer
//! suffix queries over the public key space. No other logic lives here.

use crate::error::Result;
use crate::radix_tree::{ConcurrencyMode, RadixTree};

pub struct ReversedTree<V> {
    inner: RadixTree<V>,
}

impl<V> ReversedTree<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_mode(ConcurrencyMode::LockFree)
    }

    pub fn with_mode(mode: ConcurrencyMode) -> Self {
        ReversedTree {
            inner: RadixTree::with_mode(mode),
        }
    }

    fn reverse(key: &str) -> String {
        key.chars().rev().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn put(&self, key: &str, value: V) -> Result<Option<V>> {
        self.inner.put(&Self::reverse(key), value)
    }

    pub fn put_if_absent(&self, key: &str, value: V) -> Result<Option<V>> {
        self.inner.put_if_absent(&Self::reverse(key), value)
    }

    pub fn remove(&self, key: &str) -> Result<Option<V>> {
        self.inner.remove(&Self::reverse(key))
    }

    pub fn get_value_for_exact_key(&self, key: &str) -> Option<V> {
        self.inner.get(&Self::reverse(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get_value_for_exact_key(key).is_some()
    }

    /// Every stored `(key, value)` pair whose key ends with `suffix`,
    /// reframed as a prefix query on the internal reversed-key tree
    /// (spec.md §4.5).
    pub fn keys_ending_with(&self, suffix: &str) -> Vec<(String, V)> {
        let reversed_suffix = Self::reverse(suffix);
        self.inner
            .entries_with_prefix(&reversed_suffix)
            .map(|(k, v)| (Self::reverse(&k), v))
            .collect()
    }

    pub fn render(&self) -> String
    where
        V: std::fmt::Debug,
    {
        self.inner.render()
    }
}

impl<V> Default for ReversedTree<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
