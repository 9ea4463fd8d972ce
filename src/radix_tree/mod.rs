mod key;
pub use self::key::{KeyMatchResult, KeyPrefix};

mod node;
pub use self::node::{DefaultNodeFactory, Node, NodeFactory};

mod search;
pub use self::search::{SearchWalk, WalkClass};

mod mutate;

mod traversal;
pub use self::traversal::Cursor;

mod pretty;

mod tree;
pub use self::tree::{ConcurrencyMode, RadixTree};

/// Renders any `RadixTree` with a caller-supplied value formatter — the hook
/// `SuffixTree`/`ReversedTree` use to print their own payload shape (spec.md
/// §6).
pub fn pretty_render<V>(tree: &RadixTree<V>, value_fmt: &dyn Fn(&V) -> String) -> String
where
    V: Clone + Send + Sync + 'static,
{
    pretty::render(&tree.snapshot_root(), value_fmt)
}
