//! LazyTraversal (spec.md §4.6, L5): a stateful pre-order cursor over a
//! subtree, advanced one node at a time via an explicit work stack rather
//! than materializing the whole result set up front.

use std::sync::Arc;

use crate::error::{Error, ErrorKind, Result};

use super::node::Node;

struct Frame<V> {
    node: Arc<Node<V>>,
    key: Vec<char>,
}

enum State {
    Live,
    /// The producer already faulted; every subsequent poll re-raises
    /// `IllegalState` instead of touching the stack again (spec.md §7).
    Poisoned,
}

/// A lazily-advancing, read-only iterator over the key/value pairs stored in
/// a subtree, visited in pre-order. Cloning the values out of shared nodes
/// requires `V: Clone`.
pub struct Cursor<V> {
    stack: Vec<Frame<V>>,
    state: State,
    /// The result of the most recent `has_next` peek, held until the matching
    /// `next_result`/`next` consumes it. `has_next` must be idempotent
    /// without an intervening `next` (spec.md §4.6), which means peeking has
    /// to cache what it found rather than re-running `advance` (and thereby
    /// re-popping stack frames) on every call.
    peeked: Option<(String, V)>,
}

impl<V> Cursor<V> {
    pub(crate) fn over_subtree(node: Arc<Node<V>>, key: Vec<char>) -> Self {
        Cursor {
            stack: vec![Frame { node, key }],
            state: State::Live,
            peeked: None,
        }
    }

    pub(crate) fn empty() -> Self {
        Cursor {
            stack: Vec::new(),
            state: State::Live,
            peeked: None,
        }
    }

    /// True if a subsequent call to `next_result` would yield an element
    /// rather than `Ok(None)`. Does not consume the element; repeated calls
    /// without an intervening `next`/`next_result` return the same answer
    /// (spec.md §4.6's idempotent-`hasNext` clause).
    ///
    /// This has to actually run the traversal up to the next terminal node,
    /// not just inspect the frames already pushed: a prefix query's root
    /// frame is frequently a non-terminal branching node whose children (or
    /// deeper descendants) haven't been expanded onto the stack yet.
    pub fn has_next(&mut self) -> bool
    where
        V: Clone,
    {
        if matches!(self.state, State::Poisoned) {
            return false;
        }
        if self.peeked.is_some() {
            return true;
        }
        match self.advance() {
            Ok(Some(item)) => {
                self.peeked = Some(item);
                true
            }
            Ok(None) => false,
            Err(_) => {
                self.state = State::Poisoned;
                false
            }
        }
    }

    /// Advances the cursor, returning the next key/value pair, `Ok(None)` at
    /// the end, or `Err` with `IllegalState` if the cursor already faulted.
    pub fn next_result(&mut self) -> Result<Option<(String, V)>>
    where
        V: Clone,
    {
        if matches!(self.state, State::Poisoned) {
            return Err(ErrorKind::IllegalState.into());
        }
        if let Some(item) = self.peeked.take() {
            return Ok(Some(item));
        }

        match self.advance() {
            Ok(item) => Ok(item),
            Err(err) => {
                self.state = State::Poisoned;
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> Result<Option<(String, V)>>
    where
        V: Clone,
    {
        while let Some(Frame { node, key }) = self.stack.pop() {
            for child in node.children().iter().rev() {
                let mut child_key = key.clone();
                child_key.extend_from_slice(child.label().chars());
                self.stack.push(Frame {
                    node: Arc::clone(child),
                    key: child_key,
                });
            }

            if let Some(value) = node.value() {
                return Ok(Some((key.into_iter().collect(), value.clone())));
            }
        }

        Ok(None)
    }

    /// Cursors are read-only views over an immutable snapshot; removal
    /// through a cursor is not supported (spec.md §4.6).
    pub fn remove(&mut self) -> Result<()> {
        Err(ErrorKind::UnsupportedOperation("cursors over this tree family are read-only".into()).into())
    }
}

impl<V: Clone> Iterator for Cursor<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_result() {
            Ok(item) => item,
            Err(_) => None,
        }
    }
}

/// Forces the next element, raising `NoSuchElement` past the end — the
/// explicit poll half of the `hasNext`/`next` contract (spec.md §4.6) for
/// callers who don't want `Option`-folding `Iterator` semantics.
pub fn require_next<V: Clone>(cursor: &mut Cursor<V>) -> Result<(String, V)> {
    match cursor.next_result()? {
        Some(item) => Ok(item),
        None => Err(Error::from(ErrorKind::NoSuchElement)),
    }
}
