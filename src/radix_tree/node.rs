use std::fmt;
use std::sync::Arc;

use super::key::KeyPrefix;

/// A single node in the tree. Immutable once reachable from a published
/// root — mutation always produces a new `Node` and republishes it into the
/// parent's child slot (spec.md §3, "Identity is structural; nodes are
/// immutable once published").
pub struct Node<V> {
    label: KeyPrefix,
    value: Option<V>,
    children: Box<[Arc<Node<V>>]>,
    is_root: bool,
}

impl<V> Node<V> {
    pub fn label(&self) -> &KeyPrefix {
        &self.label
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn children(&self) -> &[Arc<Node<V>>] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// A node with a present value is a key-terminal (spec.md §3).
    pub fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    /// Binary search over children by first edge character (spec.md §4.1:
    /// "Child-list lookup by first character must run in O(log k)").
    pub(crate) fn child_index(&self, c: char) -> Result<usize, usize> {
        self.children
            .binary_search_by(|child| child.label.first().expect("non-root child has a label").cmp(&c))
    }

    pub(crate) fn find_child(&self, c: char) -> Option<&Arc<Node<V>>> {
        self.child_index(c).ok().map(|idx| &self.children[idx])
    }
}

impl<V: fmt::Debug> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Node")
            .field("label", &self.label.to_string())
            .field("value", &self.value)
            .field("children", &self.children.len())
            .field("is_root", &self.is_root)
            .finish()
    }
}

/// External collaborator (spec.md §4.1, §6): produces a concrete node given
/// its observable attributes. Implementations may specialize storage for
/// small child lists; the default simply stores a sorted boxed slice.
pub trait NodeFactory<V>: Send + Sync {
    fn create_node(
        &self,
        label: KeyPrefix,
        value: Option<V>,
        children: Vec<Arc<Node<V>>>,
        is_root: bool,
    ) -> Arc<Node<V>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNodeFactory;

impl<V> NodeFactory<V> for DefaultNodeFactory {
    fn create_node(
        &self,
        label: KeyPrefix,
        value: Option<V>,
        mut children: Vec<Arc<Node<V>>>,
        is_root: bool,
    ) -> Arc<Node<V>> {
        children.sort_by_key(|child| child.label.first());
        debug_assert!(
            children.windows(2).all(|w| w[0].label.first() != w[1].label.first()),
            "two children may never share a first label character"
        );
        Arc::new(Node {
            label,
            value,
            children: children.into_boxed_slice(),
            is_root,
        })
    }
}

pub(crate) fn new_root<V>(factory: &dyn NodeFactory<V>) -> Arc<Node<V>> {
    factory.create_node(KeyPrefix::empty(), None, Vec::new(), true)
}
