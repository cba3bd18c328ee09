//! pooled-btree - an in-memory B-tree with a shareable node pool.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          BTree<T>                               │
//! │   insert_or_replace / delete / get / min / max / ascend* ...    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────┐        ┌──────────────────────────┐   │
//! │  │  Node algorithms     │        │  Range iterator          │   │
//! │  │  split / insert /    │        │  one bounded walk,       │   │
//! │  │  remove / rebalance  │        │  ascend or descend       │   │
//! │  └──────────┬───────────┘        └────────────┬─────────────┘   │
//! │             ↓                                 ↓                 │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │      NodeArena: Vec<Node<T>> indexed by NodeId           │   │
//! │  │      Node = sorted Items<T> + child NodeIds              │   │
//! │  └───────────────────────────┬─────────────────────────────┘   │
//! └──────────────────────────────┼──────────────────────────────────┘
//!                                ↓
//!              ┌───────────────────────────────────┐
//!              │  NodePool<T> (Mutex free list)    │
//!              │  shareable between trees via Arc  │
//!              └───────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`btree`] - The tree and its node-level algorithms
//! - [`pool`] - Node pooling and pool statistics
//!
//! # Quick Start
//! ```
//! use std::sync::Arc;
//! use pooled_btree::{BTree, NodePool};
//!
//! let pool = Arc::new(NodePool::new(64));
//! let mut tree = BTree::with_pool(2, Arc::clone(&pool));
//!
//! tree.insert_or_replace(3);
//! tree.insert_or_replace(1);
//! assert_eq!(tree.insert_or_replace(3), Some(3));
//! assert_eq!(tree.len(), 2);
//!
//! let mut desc = vec![];
//! tree.descend(|v| {
//!     desc.push(*v);
//!     true
//! });
//! assert_eq!(desc, vec![3, 1]);
//! ```

pub mod btree;
pub mod common;
pub mod pool;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_FREE_LIST_SIZE, MIN_DEGREE};
pub use common::{Error, NodeId, Result};

pub use btree::BTree;
pub use pool::{NodePool, PoolStats, PoolStatsSnapshot};
