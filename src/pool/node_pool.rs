//! Node Pool - recycles empty node shells across trees.
//!
//! The [`NodePool`] provides:
//! - A bounded free list of empty node shells
//! - Mutex-guarded acquire/release, so one pool can serve many trees
//! - Allocation and reuse statistics

use std::fmt;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;

use crate::btree::node::Node;
use crate::common::config::DEFAULT_FREE_LIST_SIZE;
use crate::pool::PoolStats;

/// A bounded pool of recycled node shells.
///
/// # Thread Safety
/// - `free_list`: `Mutex` - the only shared mutable state
/// - `stats`: No lock - all atomic counters
///
/// Trees never hold the lock while working on their own nodes, so sharing a
/// pool between trees on different threads is safe as long as each tree is
/// itself only mutated by one thread at a time.
///
/// # Usage
/// ```
/// use std::sync::Arc;
/// use pooled_btree::{BTree, NodePool};
///
/// let pool = Arc::new(NodePool::new(64));
/// let mut a: BTree<u32> = BTree::with_pool(2, Arc::clone(&pool));
/// let mut b: BTree<u32> = BTree::with_pool(4, Arc::clone(&pool));
///
/// a.insert_or_replace(1);
/// b.insert_or_replace(2);
/// ```
pub struct NodePool<T> {
    /// Stack of empty shells (LIFO so recently used buffers are reused first).
    free_list: Mutex<Vec<Node<T>>>,

    /// Maximum number of shells kept on the free list.
    capacity: usize,

    /// Performance statistics.
    stats: PoolStats,
}

impl<T> NodePool<T> {
    /// Create a pool that keeps at most `capacity` shells.
    ///
    /// A capacity of 0 is allowed and turns the pool into a pass-through
    /// allocator.
    pub fn new(capacity: usize) -> Self {
        Self {
            free_list: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            stats: PoolStats::new(),
        }
    }

    /// Hand out an empty node, recycled if possible.
    pub(crate) fn acquire(&self) -> Node<T> {
        let recycled = self.free_list.lock().pop();

        match recycled {
            Some(node) => {
                self.stats.reused.fetch_add(1, Ordering::Relaxed);
                node
            }
            None => {
                self.stats.allocated.fetch_add(1, Ordering::Relaxed);
                Node::new()
            }
        }
    }

    /// Take back a node that is no longer part of any tree.
    ///
    /// The node is emptied first so the pool never keeps items or child
    /// handles alive. It is dropped if the pool is already full.
    pub(crate) fn release(&self, mut node: Node<T>) {
        node.items.truncate(0);
        node.children.clear();

        let mut fl = self.free_list.lock();
        if fl.len() < self.capacity {
            fl.push(node);
            drop(fl);
            self.stats.released.fetch_add(1, Ordering::Relaxed);
        } else {
            drop(fl);
            self.stats.discarded.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(capacity = self.capacity, "node pool full, discarding shell");
        }
    }

    /// Number of shells currently held.
    pub fn len(&self) -> usize {
        self.free_list.lock().len()
    }

    /// Whether the pool holds no shells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of shells the pool keeps.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get pool statistics.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }
}

impl<T> Default for NodePool<T> {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_LIST_SIZE)
    }
}

impl<T> fmt::Debug for NodePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePool")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::NodeId;

    #[test]
    fn test_acquire_from_empty_pool_allocates() {
        let pool: NodePool<u32> = NodePool::new(4);

        let node = pool.acquire();
        assert!(node.items.is_empty());
        assert!(node.children.is_empty());

        let snapshot = pool.stats().snapshot();
        assert_eq!(snapshot.allocated, 1);
        assert_eq!(snapshot.reused, 0);
    }

    #[test]
    fn test_release_then_acquire_reuses() {
        let pool: NodePool<u32> = NodePool::new(4);

        let node = pool.acquire();
        pool.release(node);
        assert_eq!(pool.len(), 1);

        let _node = pool.acquire();
        assert!(pool.is_empty());

        let snapshot = pool.stats().snapshot();
        assert_eq!(snapshot.allocated, 1);
        assert_eq!(snapshot.reused, 1);
        assert_eq!(snapshot.released, 1);
    }

    #[test]
    fn test_release_clears_contents() {
        let pool: NodePool<u32> = NodePool::new(4);

        let mut node = pool.acquire();
        node.items.push(7);
        node.children.push(NodeId::new(1));
        node.children.push(NodeId::new(2));
        pool.release(node);

        let node = pool.acquire();
        assert!(node.items.is_empty());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_release_beyond_capacity_discards() {
        let pool: NodePool<u32> = NodePool::new(2);

        let nodes: Vec<_> = (0..3).map(|_| pool.acquire()).collect();
        for node in nodes {
            pool.release(node);
        }

        assert_eq!(pool.len(), 2);
        let snapshot = pool.stats().snapshot();
        assert_eq!(snapshot.released, 2);
        assert_eq!(snapshot.discarded, 1);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let pool: NodePool<u32> = NodePool::new(0);
        pool.release(pool.acquire());
        assert!(pool.is_empty());
        assert_eq!(pool.stats().snapshot().discarded, 1);
    }

    #[test]
    fn test_default_capacity() {
        let pool: NodePool<u32> = NodePool::default();
        assert_eq!(pool.capacity(), DEFAULT_FREE_LIST_SIZE);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        use std::sync::Arc;
        use std::thread;

        let pool: Arc<NodePool<u64>> = Arc::new(NodePool::new(8));
        let mut handles = vec![];

        for _ in 0..8 {
            let pool_clone = Arc::clone(&pool);
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    let node = pool_clone.acquire();
                    pool_clone.release(node);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(pool.len() <= pool.capacity());
        let snapshot = pool.stats().snapshot();
        assert_eq!(snapshot.acquired(), 8 * 500);
        assert_eq!(snapshot.released + snapshot.discarded, 8 * 500);
    }
}
