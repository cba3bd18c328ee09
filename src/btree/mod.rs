//! B-tree implementation.
//!
//! # Components
//! - [`BTree`] - The public ordered set
//! - `items` - Sorted item list with binary-search find
//! - `node` - Node shells and split/insert/remove/rebalance
//! - `arena` - Handle-indexed node storage per tree
//! - `iter` - Bounded traversal shared by every ascend/descend scan

mod arena;
mod items;
mod iter;
pub(crate) mod node;
mod tree;

pub use tree::BTree;
