//! SearchWalk (spec.md §4.2): walks from the root following child edges by
//! first-character match and shared prefix, classifying where the walk
//! stopped.

use std::sync::Arc;

use super::key::KeyMatchResult;
use super::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkClass {
    /// `charsMatched == key.len()` and the edge into `node_found` matched
    /// in full.
    ExactMatch,
    /// The key is exhausted partway through `node_found`'s edge label.
    KeyEndsMidEdge,
    /// The walk diverged partway through `node_found`'s edge label while
    /// key characters remain.
    IncompleteCharactersInEdge,
    /// `node_found`'s whole edge matched, key characters remain, and no
    /// child starts with the next key character.
    NoSubTree,
    /// Degenerate form of `NoSubTree` where `node_found` is the root.
    MatchRoot,
}

/// The classified outcome of walking a key from the root.
pub struct SearchWalk<'k, V> {
    pub node_found: Arc<Node<V>>,
    pub class: WalkClass,
    /// How many characters of `node_found.label()` were matched.
    pub matched_in_node: usize,
    /// The as-yet-unmatched suffix of the key (empty for `ExactMatch`).
    pub remaining_key: &'k [char],
    /// The full path from the root through `node_found`'s own (complete)
    /// label, regardless of how much of it the query actually matched. Used
    /// to seed traversal over the subtree rooted at `node_found`.
    pub accumulated_key: Vec<char>,
}

impl<'k, V> SearchWalk<'k, V> {
    pub fn is_exact_match(&self) -> bool {
        self.class == WalkClass::ExactMatch
    }

    /// True for the outcomes that admit a rooted subtree for prefix queries
    /// (spec.md §4.3: "accept outcomes EXACT_MATCH and KEY_ENDS_MID_EDGE").
    pub fn has_subtree_for_prefix(&self) -> bool {
        matches!(self.class, WalkClass::ExactMatch | WalkClass::KeyEndsMidEdge)
    }
}

/// Walk `key` from `root`, classifying the stopping point.
///
/// `key` must be non-empty; callers validate that before calling (spec.md
/// §4.3: empty keys are rejected up front with an invalid-argument signal).
pub fn walk<'k, V>(root: &Arc<Node<V>>, key: &'k [char]) -> SearchWalk<'k, V> {
    debug_assert!(!key.is_empty());

    let mut current = Arc::clone(root);
    let mut remaining = key;
    let mut acc: Vec<char> = Vec::new();

    loop {
        if remaining.is_empty() {
            let matched_in_node = current.label().len();
            return SearchWalk {
                node_found: current,
                class: WalkClass::ExactMatch,
                matched_in_node,
                remaining_key: remaining,
                accumulated_key: acc,
            };
        }

        let next_char = remaining[0];
        let child = match current.find_child(next_char) {
            Some(child) => Arc::clone(child),
            None => {
                let matched_in_node = current.label().len();
                let class = if current.is_root() {
                    WalkClass::MatchRoot
                } else {
                    WalkClass::NoSubTree
                };
                return SearchWalk {
                    node_found: current,
                    class,
                    matched_in_node,
                    remaining_key: remaining,
                    accumulated_key: acc,
                };
            }
        };

        match child.label().match_with(remaining) {
            KeyMatchResult::Complete => {
                acc.extend_from_slice(child.label().chars());
                remaining = &[];
                current = child;
            }
            KeyMatchResult::Partial(rest) => {
                acc.extend_from_slice(child.label().chars());
                remaining = rest;
                current = child;
            }
            KeyMatchResult::LongerPrefix(split_idx) => {
                acc.extend_from_slice(child.label().chars());
                return SearchWalk {
                    node_found: child,
                    class: WalkClass::KeyEndsMidEdge,
                    matched_in_node: split_idx,
                    remaining_key: &[],
                    accumulated_key: acc,
                };
            }
            KeyMatchResult::Incomplete(split_idx, rest) => {
                acc.extend_from_slice(child.label().chars());
                return SearchWalk {
                    node_found: child,
                    class: WalkClass::IncompleteCharactersInEdge,
                    matched_in_node: split_idx,
                    remaining_key: rest,
                    accumulated_key: acc,
                };
            }
        }
    }
}
