//! Bottom-up rebuild logic backing `RadixTree::put`/`put_if_absent`/`remove`
//! (spec.md §4.3). Mirrors the same `KeyMatchResult` classification that
//! `search::walk` uses for reads, but threads ownership of fresh `Arc<Node<V>>`
//! values back up to the caller instead of just reporting where the walk
//! stopped.

use std::sync::Arc;

use super::key::{KeyMatchResult, KeyPrefix};
use super::node::{Node, NodeFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Overwrite any existing value at the exact key.
    Put,
    /// Leave an existing value at the exact key untouched.
    PutIfAbsent,
}

/// Insert `value` at `key` under `node`, whose own label is already fully
/// consumed by the caller. Returns the replacement node and the value that
/// previously occupied the exact key, if any.
pub fn insert<V: Clone>(
    factory: &dyn NodeFactory<V>,
    node: &Arc<Node<V>>,
    key: &[char],
    value: V,
    mode: InsertMode,
) -> (Arc<Node<V>>, Option<V>) {
    if key.is_empty() {
        return match (mode, node.value()) {
            (InsertMode::PutIfAbsent, Some(existing)) => (Arc::clone(node), Some(existing.clone())),
            _ => {
                let old = node.value().cloned();
                let rebuilt = factory.create_node(
                    node.label().clone(),
                    Some(value),
                    node.children().to_vec(),
                    node.is_root(),
                );
                (rebuilt, old)
            }
        };
    }

    let next_char = key[0];
    match node.find_child(next_char) {
        None => {
            let leaf = factory.create_node(KeyPrefix::new(key), Some(value), Vec::new(), false);
            let mut children = node.children().to_vec();
            children.push(leaf);
            let rebuilt = factory.create_node(node.label().clone(), node.value().cloned(), children, node.is_root());
            (rebuilt, None)
        }
        Some(child) => match child.label().match_with(key) {
            KeyMatchResult::Complete => {
                let (new_child, old) = insert(factory, child, &[], value, mode);
                (replace_child(factory, node, next_char, new_child), old)
            }
            KeyMatchResult::Partial(rest) => {
                let (new_child, old) = insert(factory, child, rest, value, mode);
                (replace_child(factory, node, next_char, new_child), old)
            }
            KeyMatchResult::LongerPrefix(split_idx) => {
                // Key ends mid-edge: split the edge and hang the new value on
                // the upper half, the existing subtree on the lower half.
                log::trace!("splitting edge at {} chars (key ends mid-edge)", split_idx);
                let (common, suffix) = child.label().split_at(split_idx);
                let lower = factory.create_node(suffix, child.value().cloned(), child.children().to_vec(), false);
                let upper = factory.create_node(common, Some(value), vec![lower], false);
                (replace_child(factory, node, next_char, upper), None)
            }
            KeyMatchResult::Incomplete(split_idx, rest) => {
                // Edge and key diverge partway through: split the edge and
                // branch into the existing subtree and a fresh leaf.
                log::trace!("splitting edge at {} chars (new branch)", split_idx);
                let (common, suffix) = child.label().split_at(split_idx);
                let lower = factory.create_node(suffix, child.value().cloned(), child.children().to_vec(), false);
                let leaf = factory.create_node(KeyPrefix::new(rest), Some(value), Vec::new(), false);
                let upper = factory.create_node(common, None, vec![lower, leaf], false);
                (replace_child(factory, node, next_char, upper), None)
            }
        },
    }
}

/// Remove `key` from under `node`. Returns `None` when `node` itself should
/// be detached from its parent's child list (only possible for non-root
/// nodes that end up with neither a value nor children); otherwise the
/// replacement node. The second element is the removed value, if any.
pub fn remove<V: Clone>(
    factory: &dyn NodeFactory<V>,
    node: &Arc<Node<V>>,
    key: &[char],
) -> (Option<Arc<Node<V>>>, Option<V>) {
    if key.is_empty() {
        if node.value().is_none() {
            return (Some(Arc::clone(node)), None);
        }
        let removed = node.value().cloned();
        let children = node.children();
        if node.is_root() {
            let rebuilt = factory.create_node(node.label().clone(), None, children.to_vec(), true);
            return (Some(rebuilt), removed);
        }
        return match children.len() {
            0 => (None, removed),
            1 => (Some(merge_with_only_child(factory, node, &children[0])), removed),
            _ => {
                let rebuilt = factory.create_node(node.label().clone(), None, children.to_vec(), false);
                (Some(rebuilt), removed)
            }
        };
    }

    let next_char = key[0];
    let child = match node.find_child(next_char) {
        None => return (Some(Arc::clone(node)), None),
        Some(child) => child,
    };

    let rest = match child.label().match_with(key) {
        KeyMatchResult::Complete => &[][..],
        KeyMatchResult::Partial(rest) => rest,
        KeyMatchResult::LongerPrefix(_) | KeyMatchResult::Incomplete(_, _) => {
            return (Some(Arc::clone(node)), None);
        }
    };

    let (child_result, removed) = remove(factory, child, rest);
    if removed.is_none() {
        return (Some(Arc::clone(node)), None);
    }

    match child_result {
        Some(new_child) => (Some(replace_child(factory, node, next_char, new_child)), removed),
        None => {
            let mut remaining: Vec<Arc<Node<V>>> = node
                .children()
                .iter()
                .filter(|c| c.label().first() != Some(next_char))
                .cloned()
                .collect();
            if !node.is_root() && node.value().is_none() && remaining.len() == 1 {
                let only = remaining.pop().expect("checked len == 1 above");
                (Some(merge_with_only_child(factory, node, &only)), removed)
            } else {
                let rebuilt = factory.create_node(node.label().clone(), node.value().cloned(), remaining, node.is_root());
                (Some(rebuilt), removed)
            }
        }
    }
}

fn merge_with_only_child<V: Clone>(
    factory: &dyn NodeFactory<V>,
    node: &Arc<Node<V>>,
    only_child: &Arc<Node<V>>,
) -> Arc<Node<V>> {
    log::trace!(
        "collapsing value-less single-child node ({:?} + {:?})",
        node.label().to_string(),
        only_child.label().to_string()
    );
    let merged_label = node.label().concat(only_child.label());
    factory.create_node(
        merged_label,
        only_child.value().cloned(),
        only_child.children().to_vec(),
        false,
    )
}

fn replace_child<V: Clone>(
    factory: &dyn NodeFactory<V>,
    node: &Arc<Node<V>>,
    old_first_char: char,
    new_child: Arc<Node<V>>,
) -> Arc<Node<V>> {
    let mut children: Vec<Arc<Node<V>>> = node
        .children()
        .iter()
        .filter(|c| c.label().first() != Some(old_first_char))
        .cloned()
        .collect();
    children.push(new_child);
    factory.create_node(node.label().clone(), node.value().cloned(), children, node.is_root())
}
