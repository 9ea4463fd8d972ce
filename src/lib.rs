//! A family of concurrent in-memory containers keyed by character sequences:
//! a compressed radix tree, and two thin wrappers over it — a suffix tree
//! and a reversed radix tree.

pub mod error;
pub mod radix_tree;
pub mod reversed_tree;
pub mod suffix_tree;

pub use error::{Error, ErrorKind, Result};
pub use radix_tree::{ConcurrencyMode, RadixTree};
pub use reversed_tree::ReversedTree;
pub use suffix_tree::SuffixTree;
