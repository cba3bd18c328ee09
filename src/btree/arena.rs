//! Node arena - handle-indexed storage for one tree's nodes.

use std::sync::Arc;

use crate::btree::node::Node;
use crate::common::NodeId;
use crate::pool::NodePool;

/// Owns every node of a single tree.
///
/// Nodes refer to their children by [`NodeId`], which indexes `nodes`.
/// Slots freed by merges or root demotion are remembered in `vacant` and
/// filled again by the next allocation. The slot's buffers themselves go to
/// the shared [`NodePool`], which may hand them to a different tree.
pub(crate) struct NodeArena<T> {
    /// Node slots. Vacant slots hold an empty, unallocated node.
    nodes: Vec<Node<T>>,

    /// Stack of vacant slot indices.
    vacant: Vec<NodeId>,

    /// Source and sink of node shells.
    pool: Arc<NodePool<T>>,
}

impl<T> NodeArena<T> {
    pub fn new(pool: Arc<NodePool<T>>) -> Self {
        Self {
            nodes: Vec::new(),
            vacant: Vec::new(),
            pool,
        }
    }

    /// Place a shell from the pool into a slot and return its handle.
    pub fn alloc(&mut self) -> NodeId {
        let shell = self.pool.acquire();

        match self.vacant.pop() {
            Some(id) => {
                self.nodes[id.0] = shell;
                id
            }
            None => {
                self.nodes.push(shell);
                NodeId::new(self.nodes.len() - 1)
            }
        }
    }

    /// Vacate a slot and return its shell to the pool.
    ///
    /// The caller must already have unlinked `id` from its parent.
    pub fn free(&mut self, id: NodeId) {
        let node = std::mem::take(&mut self.nodes[id.0]);
        self.vacant.push(id);
        self.pool.release(node);
    }

    /// Return every live node to the pool and forget all slots.
    pub fn clear(&mut self) {
        let mut vacant = std::mem::take(&mut self.vacant);
        vacant.sort_unstable();

        for (index, node) in self.nodes.drain(..).enumerate() {
            if vacant.binary_search(&NodeId::new(index)).is_err() {
                self.pool.release(node);
            }
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    /// Borrow two distinct nodes mutably at once.
    ///
    /// # Panics
    /// Panics if `a == b`.
    pub fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<T>, &mut Node<T>) {
        assert_ne!(a, b, "pair_mut needs two distinct nodes");

        if a.0 < b.0 {
            let (lo, hi) = self.nodes.split_at_mut(b.0);
            (&mut lo[a.0], &mut hi[0])
        } else {
            let (lo, hi) = self.nodes.split_at_mut(a.0);
            (&mut hi[0], &mut lo[b.0])
        }
    }

    /// Number of occupied slots.
    pub fn live(&self) -> usize {
        self.nodes.len() - self.vacant.len()
    }

    pub fn pool(&self) -> &Arc<NodePool<T>> {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> NodeArena<u32> {
        NodeArena::new(Arc::new(NodePool::new(8)))
    }

    #[test]
    fn test_alloc_assigns_fresh_slots() {
        let mut arena = arena();

        let a = arena.alloc();
        let b = arena.alloc();

        assert_ne!(a, b);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    fn test_free_slot_is_reused() {
        let mut arena = arena();

        let a = arena.alloc();
        let _b = arena.alloc();
        arena.node_mut(a).items.push(9);

        arena.free(a);
        assert_eq!(arena.live(), 1);
        assert_eq!(arena.pool().len(), 1);

        let c = arena.alloc();
        assert_eq!(c, a);
        assert!(arena.node(c).items.is_empty());
        assert_eq!(arena.pool().stats().snapshot().reused, 1);
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut arena = arena();
        let a = arena.alloc();
        let b = arena.alloc();

        {
            let (na, nb) = arena.pair_mut(a, b);
            na.items.push(1);
            nb.items.push(2);
        }
        {
            let (nb, na) = arena.pair_mut(b, a);
            assert_eq!(nb.items[0], 2);
            assert_eq!(na.items[0], 1);
        }
    }

    #[test]
    #[should_panic]
    fn test_pair_mut_same_node_panics() {
        let mut arena = arena();
        let a = arena.alloc();
        arena.pair_mut(a, a);
    }

    #[test]
    fn test_clear_releases_only_live_nodes() {
        let mut arena = arena();
        let ids: Vec<_> = (0..4).map(|_| arena.alloc()).collect();
        arena.free(ids[1]);
        assert_eq!(arena.pool().len(), 1);

        arena.clear();

        assert_eq!(arena.live(), 0);
        assert_eq!(arena.pool().len(), 4);
    }
}
