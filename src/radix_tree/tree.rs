use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, RwLock};

use crate::error::{ErrorKind, Result};

use super::mutate::{self, InsertMode};
use super::node::{new_root, DefaultNodeFactory, Node, NodeFactory};
use super::pretty;
use super::search::{self, WalkClass};
use super::traversal::Cursor;

/// Picks how writers are serialized against readers (spec.md §5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyMode {
    /// Readers never block: the root is published via a single atomic store
    /// and writers serialize against each other only.
    LockFree,
    /// Readers and writers share a conventional reader-writer lock.
    Restricted,
}

enum Backing<V> {
    LockFree { root: ArcSwap<Node<V>>, writer: Mutex<()> },
    Restricted { guarded: RwLock<Arc<Node<V>>> },
}

/// A concurrent compressed radix tree over character-sequence keys (spec.md
/// §4.3, L4). Readers never block a writer and vice versa in `LockFree` mode;
/// `Restricted` mode trades that for a conventional reader-writer lock.
pub struct RadixTree<V> {
    factory: Arc<dyn NodeFactory<V>>,
    backing: Backing<V>,
    size: AtomicUsize,
}

impl<V> RadixTree<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_mode(ConcurrencyMode::LockFree)
    }

    pub fn with_mode(mode: ConcurrencyMode) -> Self {
        Self::with_factory(mode, Arc::new(DefaultNodeFactory))
    }

    pub fn with_factory(mode: ConcurrencyMode, factory: Arc<dyn NodeFactory<V>>) -> Self {
        let root = new_root(factory.as_ref());
        let backing = match mode {
            ConcurrencyMode::LockFree => Backing::LockFree {
                root: ArcSwap::new(root),
                writer: Mutex::new(()),
            },
            ConcurrencyMode::Restricted => Backing::Restricted {
                guarded: RwLock::new(root),
            },
        };
        RadixTree {
            factory,
            backing,
            size: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load_root(&self) -> Arc<Node<V>> {
        match &self.backing {
            Backing::LockFree { root, .. } => root.load_full(),
            Backing::Restricted { guarded } => Arc::clone(&guarded.read()),
        }
    }

    /// Runs `edit` against the current root under writer exclusion and
    /// publishes whatever it returns (spec.md §5: "the single atomic publish
    /// point").
    fn with_writer<R>(&self, edit: impl FnOnce(&Arc<Node<V>>) -> (Arc<Node<V>>, R)) -> R {
        match &self.backing {
            Backing::LockFree { root, writer } => {
                let _guard = writer.lock();
                let current = root.load_full();
                log::trace!("lock-free writer acquired");
                let (new_root, result) = edit(&current);
                root.store(new_root);
                result
            }
            Backing::Restricted { guarded } => {
                let mut write_guard = guarded.write();
                let current = Arc::clone(&write_guard);
                let (new_root, result) = edit(&current);
                *write_guard = new_root;
                result
            }
        }
    }

    fn validate_key(key: &str) -> Result<Vec<char>> {
        if key.is_empty() {
            return Err(ErrorKind::InvalidArgument("key must not be empty".into()).into());
        }
        Ok(key.chars().collect())
    }

    /// Associates `value` with `key`, overwriting any existing value.
    /// Returns the value previously associated with `key`, if any.
    pub fn put(&self, key: &str, value: V) -> Result<Option<V>> {
        let chars = Self::validate_key(key)?;
        let old = self.with_writer(|root| mutate::insert(self.factory.as_ref(), root, &chars, value, InsertMode::Put));
        if old.is_none() {
            self.size.fetch_add(1, Ordering::Relaxed);
        }
        Ok(old)
    }

    /// Associates `value` with `key` only if `key` is currently absent.
    /// Returns the value already present, if any.
    pub fn put_if_absent(&self, key: &str, value: V) -> Result<Option<V>> {
        let chars = Self::validate_key(key)?;
        let old = self.with_writer(|root| {
            mutate::insert(self.factory.as_ref(), root, &chars, value, InsertMode::PutIfAbsent)
        });
        if old.is_none() {
            self.size.fetch_add(1, Ordering::Relaxed);
        }
        Ok(old)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&self, key: &str) -> Result<Option<V>> {
        let chars = Self::validate_key(key)?;
        let removed = self.with_writer(|root| {
            let (new_root, removed) = mutate::remove(self.factory.as_ref(), root, &chars);
            // `root` is never detached: the root-level special case in
            // `mutate::remove` always returns `Some`.
            (new_root.expect("root is never detached"), removed)
        });
        if removed.is_some() {
            self.size.fetch_sub(1, Ordering::Relaxed);
        }
        Ok(removed)
    }

    /// Optimistic replacement of the value at `key` (spec.md §4.4/§5: "read
    /// current set, build a superset, republish via a compare-and-set").
    /// `is_current` is handed the value observed under the writer lock; the
    /// swap is applied only if it returns true, letting callers compare by
    /// whatever notion of identity their `V` supports (pointer equality for
    /// `Arc`-based sets, structural equality otherwise).
    pub fn compare_and_swap(&self, key: &str, is_current: impl FnOnce(Option<&V>) -> bool, new: V) -> Result<bool> {
        let chars = Self::validate_key(key)?;
        let mut was_absent = false;
        let swapped = self.with_writer(|root| {
            let walk = search::walk(root, &chars);
            let current_value = if walk.class == WalkClass::ExactMatch {
                walk.node_found.value()
            } else {
                None
            };
            if !is_current(current_value) {
                return (Arc::clone(root), false);
            }
            was_absent = current_value.is_none();
            let (new_root, _old) = mutate::insert(self.factory.as_ref(), root, &chars, new, InsertMode::Put);
            (new_root, true)
        });
        if swapped && was_absent {
            self.size.fetch_add(1, Ordering::Relaxed);
        }
        Ok(swapped)
    }

    /// Optimistic removal: deletes `key` only if its current value still
    /// satisfies `is_current`, guarding against a concurrent writer having
    /// replaced it since the caller last observed it.
    pub fn compare_and_remove(&self, key: &str, is_current: impl FnOnce(Option<&V>) -> bool) -> Result<bool> {
        let chars = Self::validate_key(key)?;
        let mut did_remove = false;
        self.with_writer(|root| {
            let walk = search::walk(root, &chars);
            let current_value = if walk.class == WalkClass::ExactMatch {
                walk.node_found.value()
            } else {
                None
            };
            if current_value.is_none() || !is_current(current_value) {
                return (Arc::clone(root), ());
            }
            let (new_root, _removed) = mutate::remove(self.factory.as_ref(), root, &chars);
            did_remove = true;
            (new_root.expect("root is never detached"), ())
        });
        if did_remove {
            self.size.fetch_sub(1, Ordering::Relaxed);
        }
        Ok(did_remove)
    }

    /// The current root, for callers (the pretty-printer, wrapper
    /// containers) that need a consistent snapshot of the whole tree.
    pub(crate) fn snapshot_root(&self) -> Arc<Node<V>> {
        self.load_root()
    }

    /// Returns the value associated with the exact key, if any. Empty keys
    /// trivially return `None` (the root never carries a value).
    pub fn get(&self, key: &str) -> Option<V> {
        if key.is_empty() {
            return None;
        }
        let chars: Vec<char> = key.chars().collect();
        let root = self.load_root();
        let walk = search::walk(&root, &chars);
        if walk.class == WalkClass::ExactMatch {
            walk.node_found.value().cloned()
        } else {
            None
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn subtree_for_prefix(&self, prefix: &str) -> Option<(Arc<Node<V>>, Vec<char>)> {
        let root = self.load_root();
        let chars: Vec<char> = prefix.chars().collect();
        if chars.is_empty() {
            return Some((Arc::clone(&root), Vec::new()));
        }
        let walk = search::walk(&root, &chars);
        if walk.has_subtree_for_prefix() {
            Some((walk.node_found, walk.accumulated_key))
        } else {
            None
        }
    }

    /// A lazily-advancing cursor over every key stored under `prefix`, in
    /// pre-order (spec.md §4.6, L5).
    pub fn entries_with_prefix(&self, prefix: &str) -> Cursor<V> {
        match self.subtree_for_prefix(prefix) {
            Some((node, key)) => Cursor::over_subtree(node, key),
            None => Cursor::empty(),
        }
    }

    pub fn keys(&self) -> Cursor<V> {
        self.entries_with_prefix("")
    }

    /// Renders the tree as the ASCII box-drawing tree format (spec.md §6).
    pub fn render(&self) -> String
    where
        V: std::fmt::Debug,
    {
        pretty::render_radix(&self.load_root())
    }
}

impl<V> Default for RadixTree<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
