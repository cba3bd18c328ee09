//! Node pooling.
//!
//! Splits allocate nodes and merges free them. The pool keeps the emptied
//! node shells (with their buffers) around so later splits can reuse them
//! instead of going back to the allocator.
//!
//! # Components
//! - [`NodePool`] - Mutex-guarded free list of node shells, shareable
//!   between trees
//! - [`PoolStats`] - Allocation and reuse counters

mod node_pool;
mod stats;

pub use node_pool::NodePool;
pub use stats::{PoolStats, PoolStatsSnapshot};
