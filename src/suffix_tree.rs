//! `SuffixTree` (spec.md §4.4, L6): indexes every non-empty suffix of every
//! inserted key into an internal `RadixTree` whose values are the set of
//! original keys that suffix came from, so substring and suffix queries fall
//! out of ordinary prefix queries on the index.

use std::collections::HashMap;
use std::collections::HashSet as StdHashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{ErrorKind, Result};
use crate::radix_tree::RadixTree;

/// A pluggable collection of original keys sharing one suffix (spec.md §4.4,
/// §6: `createSetForOriginalKeys`). Implementations are immutable — mutating
/// methods return a new instance — so they compose with the radix tree's
/// compare-and-swap republication.
pub trait KeySet: Send + Sync {
    fn contains(&self, key: &str) -> bool;
    fn with_inserted(&self, key: &str) -> Arc<dyn KeySet>;
    fn with_removed(&self, key: &str) -> Arc<dyn KeySet>;
    fn is_empty(&self) -> bool;
    fn to_vec(&self) -> Vec<String>;
}

/// Default `KeySet`: a plain hash set. Matches the teacher's use of
/// `std::collections` for small in-memory collections, with no ordering
/// guarantee of its own (callers that need determinism sort the result).
#[derive(Debug, Default)]
struct HashKeySet(StdHashSet<String>);

impl KeySet for HashKeySet {
    fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    fn with_inserted(&self, key: &str) -> Arc<dyn KeySet> {
        let mut next = self.0.clone();
        next.insert(key.to_string());
        Arc::new(HashKeySet(next))
    }

    fn with_removed(&self, key: &str) -> Arc<dyn KeySet> {
        let mut next = self.0.clone();
        next.remove(key);
        Arc::new(HashKeySet(next))
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// An insertion-ordered alternative to `HashKeySet` (spec.md §6: "tests may
/// substitute an insertion-ordered set").
#[derive(Debug, Default)]
struct OrderedKeySet(Vec<String>);

impl KeySet for OrderedKeySet {
    fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|k| k == key)
    }

    fn with_inserted(&self, key: &str) -> Arc<dyn KeySet> {
        let mut next = self.0.clone();
        if !next.iter().any(|k| k == key) {
            next.push(key.to_string());
        }
        Arc::new(OrderedKeySet(next))
    }

    fn with_removed(&self, key: &str) -> Arc<dyn KeySet> {
        let mut next = self.0.clone();
        next.retain(|k| k != key);
        Arc::new(OrderedKeySet(next))
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

type SetFactory = Arc<dyn Fn() -> Arc<dyn KeySet> + Send + Sync>;

pub fn hash_key_set_factory() -> SetFactory {
    Arc::new(|| Arc::new(HashKeySet::default()) as Arc<dyn KeySet>)
}

pub fn ordered_key_set_factory() -> SetFactory {
    Arc::new(|| Arc::new(OrderedKeySet::default()) as Arc<dyn KeySet>)
}

pub struct SuffixTree<V> {
    index: RadixTree<Arc<dyn KeySet>>,
    values: RwLock<HashMap<String, V>>,
    originals: RwLock<StdHashSet<String>>,
    set_factory: SetFactory,
}

impl<V> SuffixTree<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_set_factory(hash_key_set_factory())
    }

    pub fn with_set_factory(set_factory: SetFactory) -> Self {
        SuffixTree {
            index: RadixTree::new(),
            values: RwLock::new(HashMap::new()),
            originals: RwLock::new(StdHashSet::new()),
            set_factory,
        }
    }

    pub fn len(&self) -> usize {
        self.originals.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn put(&self, key: &str, value: V) -> Result<Option<V>> {
        self.put_internal(key, value, true)
    }

    pub fn put_if_absent(&self, key: &str, value: V) -> Result<Option<V>> {
        self.put_internal(key, value, false)
    }

    fn put_internal(&self, key: &str, value: V, overwrite: bool) -> Result<Option<V>> {
        if key.is_empty() {
            return Err(ErrorKind::InvalidArgument("key must not be empty".into()).into());
        }

        if self.originals.read().contains(key) {
            let mut values = self.values.write();
            let old = values.get(key).cloned();
            if overwrite || old.is_none() {
                values.insert(key.to_string(), value);
            }
            return Ok(old);
        }

        let chars: Vec<char> = key.chars().collect();
        for start in 0..chars.len() {
            let suffix: String = chars[start..].iter().collect();
            self.add_to_suffix(&suffix, key)?;
        }

        self.values.write().insert(key.to_string(), value);
        self.originals.write().insert(key.to_string());
        Ok(None)
    }

    fn add_to_suffix(&self, suffix: &str, original_key: &str) -> Result<()> {
        loop {
            let current = self.index.get(suffix);
            if let Some(set) = &current {
                if set.contains(original_key) {
                    return Ok(());
                }
            }
            let candidate = match &current {
                Some(set) => set.with_inserted(original_key),
                None => (self.set_factory)().with_inserted(original_key),
            };
            let expected = current.clone();
            let is_current = move |v: Option<&Arc<dyn KeySet>>| match (&expected, v) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            };
            if self.index.compare_and_swap(suffix, is_current, candidate)? {
                log::trace!("suffix index updated for suffix {:?}", suffix);
                return Ok(());
            }
            log::debug!("CAS lost the race on suffix {:?}, retrying", suffix);
        }
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        if key.is_empty() {
            return Err(ErrorKind::InvalidArgument("key must not be empty".into()).into());
        }
        if !self.originals.read().contains(key) {
            return Ok(false);
        }

        let chars: Vec<char> = key.chars().collect();
        for start in 0..chars.len() {
            let suffix: String = chars[start..].iter().collect();
            self.remove_from_suffix(&suffix, key)?;
        }

        self.values.write().remove(key);
        self.originals.write().remove(key);
        Ok(true)
    }

    fn remove_from_suffix(&self, suffix: &str, original_key: &str) -> Result<()> {
        loop {
            let current = match self.index.get(suffix) {
                Some(set) => set,
                None => return Ok(()),
            };
            if !current.contains(original_key) {
                return Ok(());
            }
            let updated = current.with_removed(original_key);
            let expected = Arc::clone(&current);
            let is_current = move |v: Option<&Arc<dyn KeySet>>| matches!(v, Some(existing) if Arc::ptr_eq(existing, &expected));

            let done = if updated.is_empty() {
                self.index.compare_and_remove(suffix, is_current)?
            } else {
                self.index.compare_and_swap(suffix, is_current, updated)?
            };
            if done {
                log::trace!("suffix index entry updated for suffix {:?}", suffix);
                return Ok(());
            }
            log::debug!("CAS lost the race on suffix {:?}, retrying", suffix);
        }
    }

    pub fn get_value_for_exact_key(&self, key: &str) -> Option<V> {
        if !self.originals.read().contains(key) {
            return None;
        }
        self.values.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.originals.read().contains(key)
    }

    /// Every stored key ending with `suffix`. The empty suffix is
    /// special-cased to the empty set (spec.md §9 Open Question) rather than
    /// unified with `get_keys_containing("")`.
    pub fn get_keys_ending_with(&self, suffix: &str) -> Vec<String> {
        if suffix.is_empty() {
            return Vec::new();
        }
        self.collect_union(suffix)
    }

    /// Every stored key containing `substring`. The empty substring matches
    /// every key (spec.md §4.4).
    pub fn get_keys_containing(&self, substring: &str) -> Vec<String> {
        if substring.is_empty() {
            let mut all: Vec<String> = self.originals.read().iter().cloned().collect();
            all.sort();
            return all;
        }
        self.collect_union(substring)
    }

    fn collect_union(&self, query: &str) -> Vec<String> {
        let mut union = StdHashSet::new();
        for (_, key_set) in self.index.entries_with_prefix(query) {
            union.extend(key_set.to_vec());
        }
        let mut result: Vec<String> = union.into_iter().collect();
        result.sort();
        result
    }

    /// Renders the suffix index as the ASCII box-drawing format (spec.md §6),
    /// with each terminal's originals set printed as a sorted bracketed list.
    pub fn render(&self) -> String {
        crate::radix_tree::pretty_render(&self.index, &|set: &Arc<dyn KeySet>| {
            let mut keys = set.to_vec();
            keys.sort();
            format!("[{}]", keys.join(", "))
        })
    }
}

impl<V> Default for SuffixTree<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
