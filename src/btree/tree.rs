//! Tree - the public B-tree type.
//!
//! [`BTree`] owns the root handle, the element count and the node arena. It
//! handles everything that happens at the root (promotion when the root is
//! full, demotion when a merge empties it) and delegates the rest to the
//! node-level algorithms.

use std::fmt;
use std::sync::Arc;

use crate::btree::arena::NodeArena;
use crate::btree::iter::{Bounds, Direction};
use crate::btree::node::Removal;
use crate::common::config::{max_items, min_items, MIN_DEGREE};
use crate::common::{Error, NodeId, Result};
use crate::pool::NodePool;

/// An ordered set of `T` stored as a B-tree of the given degree.
///
/// Equal values never coexist: inserting a value equal to a stored one
/// replaces it and hands the old one back.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────┐
/// │                      BTree<T>                        │
/// │  root: Option<NodeId>   length   degree              │
/// │  ┌────────────────────────────────────────────────┐  │
/// │  │ NodeArena: Vec<Node<T>> + vacant Vec<NodeId>   │  │
/// │  └───────────────────────┬────────────────────────┘  │
/// └──────────────────────────┼───────────────────────────┘
///                            │ acquire / release shells
///                  ┌─────────▼─────────┐
///                  │ Arc<NodePool<T>>  │  (may be shared)
///                  └───────────────────┘
/// ```
///
/// # Thread Safety
/// A tree is `Send` when `T` is, but mutation needs `&mut self`; share one
/// tree across threads behind your own lock. Trees sharing a pool may live
/// on different threads freely.
///
/// # Usage
/// ```
/// use pooled_btree::BTree;
///
/// let mut tree = BTree::new(2);
/// for v in [5, 1, 4, 2, 3] {
///     tree.insert_or_replace(v);
/// }
///
/// let mut seen = vec![];
/// tree.ascend_range(&2, &4, |v| {
///     seen.push(*v);
///     true
/// });
/// assert_eq!(seen, vec![2, 3]);
/// assert_eq!(tree.delete_min(), Some(1));
/// ```
pub struct BTree<T> {
    /// Root node, `None` while the tree is empty.
    root: Option<NodeId>,

    /// Number of items stored.
    length: usize,

    /// Branching parameter (immutable after construction).
    degree: usize,

    /// Storage for all nodes of this tree.
    nodes: NodeArena<T>,
}

impl<T: Ord> BTree<T> {
    /// Create an empty tree with its own node pool.
    ///
    /// # Panics
    /// Panics if `degree` is less than 2.
    pub fn new(degree: usize) -> Self {
        Self::with_pool(degree, Arc::new(NodePool::default()))
    }

    /// Create an empty tree that takes its nodes from `pool`.
    ///
    /// # Panics
    /// Panics if `degree` is less than 2.
    pub fn with_pool(degree: usize, pool: Arc<NodePool<T>>) -> Self {
        assert!(degree >= MIN_DEGREE, "degree must be >= {}", MIN_DEGREE);
        Self::build(degree, pool)
    }

    /// Fallible form of [`BTree::new`].
    ///
    /// # Errors
    /// - `Error::InvalidDegree` if `degree` is less than 2
    pub fn try_new(degree: usize) -> Result<Self> {
        Self::try_with_pool(degree, Arc::new(NodePool::default()))
    }

    /// Fallible form of [`BTree::with_pool`].
    ///
    /// # Errors
    /// - `Error::InvalidDegree` if `degree` is less than 2
    pub fn try_with_pool(degree: usize, pool: Arc<NodePool<T>>) -> Result<Self> {
        if degree < MIN_DEGREE {
            return Err(Error::InvalidDegree { degree });
        }
        Ok(Self::build(degree, pool))
    }

    fn build(degree: usize, pool: Arc<NodePool<T>>) -> Self {
        Self {
            root: None,
            length: 0,
            degree,
            nodes: NodeArena::new(pool),
        }
    }

    // ========================================================================
    // Public API: Mutators
    // ========================================================================

    /// Add `item` to the tree.
    ///
    /// If an equal item is already stored, it is replaced and returned.
    /// Otherwise returns `None` and the length grows by one.
    pub fn insert_or_replace(&mut self, item: T) -> Option<T> {
        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.nodes.alloc();
                self.nodes.node_mut(root).items.push(item);
                self.root = Some(root);
                self.length += 1;
                return None;
            }
        };

        let root = if self.nodes.node(root).items.len() >= self.max_items() {
            self.promote_root(root)
        } else {
            root
        };

        let max_items = self.max_items();
        let out = self.nodes.insert(root, item, max_items);
        if out.is_none() {
            self.length += 1;
        }
        out
    }

    /// Remove the item equal to `item`, returning it if present.
    pub fn delete(&mut self, item: &T) -> Option<T> {
        self.delete_item(Removal::Item(item))
    }

    /// Remove and return the smallest item.
    pub fn delete_min(&mut self) -> Option<T> {
        self.delete_item(Removal::Min)
    }

    /// Remove and return the largest item.
    pub fn delete_max(&mut self) -> Option<T> {
        self.delete_item(Removal::Max)
    }

    /// Remove every item, returning all nodes to the pool.
    pub fn clear(&mut self) {
        tracing::debug!(length = self.length, nodes = self.nodes.live(), "clearing tree");
        self.nodes.clear();
        self.root = None;
        self.length = 0;
    }

    // ========================================================================
    // Public API: Lookups
    // ========================================================================

    /// Look up the stored item equal to `key`.
    pub fn get(&self, key: &T) -> Option<&T> {
        self.nodes.get(self.root?, key)
    }

    /// Whether an item equal to `key` is stored.
    pub fn contains(&self, key: &T) -> bool {
        self.get(key).is_some()
    }

    /// Smallest item, or `None` if the tree is empty.
    pub fn min(&self) -> Option<&T> {
        self.nodes.min(self.root?)
    }

    /// Largest item, or `None` if the tree is empty.
    pub fn max(&self) -> Option<&T> {
        self.nodes.max(self.root?)
    }

    // ========================================================================
    // Public API: Iteration
    // ========================================================================

    /// Call `visit` on every item in ascending order until it returns `false`.
    pub fn ascend<F: FnMut(&T) -> bool>(&self, visit: F) {
        self.walk(Direction::Ascend, None, None, false, visit);
    }

    /// Call `visit` on every item in `[greater_or_equal, less_than)` in
    /// ascending order until it returns `false`.
    pub fn ascend_range<F: FnMut(&T) -> bool>(&self, greater_or_equal: &T, less_than: &T, visit: F) {
        self.walk(Direction::Ascend, Some(greater_or_equal), Some(less_than), true, visit);
    }

    /// Call `visit` on every item below `pivot` in ascending order until it
    /// returns `false`.
    pub fn ascend_less_than<F: FnMut(&T) -> bool>(&self, pivot: &T, visit: F) {
        self.walk(Direction::Ascend, None, Some(pivot), false, visit);
    }

    /// Call `visit` on every item at or above `pivot` in ascending order
    /// until it returns `false`.
    pub fn ascend_greater_or_equal<F: FnMut(&T) -> bool>(&self, pivot: &T, visit: F) {
        self.walk(Direction::Ascend, Some(pivot), None, true, visit);
    }

    /// Call `visit` on every item in descending order until it returns `false`.
    pub fn descend<F: FnMut(&T) -> bool>(&self, visit: F) {
        self.walk(Direction::Descend, None, None, false, visit);
    }

    /// Call `visit` on every item in `(greater_than, less_or_equal]` in
    /// descending order until it returns `false`.
    pub fn descend_range<F: FnMut(&T) -> bool>(&self, less_or_equal: &T, greater_than: &T, visit: F) {
        self.walk(Direction::Descend, Some(less_or_equal), Some(greater_than), true, visit);
    }

    /// Call `visit` on every item at or below `pivot` in descending order
    /// until it returns `false`.
    pub fn descend_less_or_equal<F: FnMut(&T) -> bool>(&self, pivot: &T, visit: F) {
        self.walk(Direction::Descend, Some(pivot), None, true, visit);
    }

    /// Call `visit` on every item above `pivot` in descending order until it
    /// returns `false`.
    pub fn descend_greater_than<F: FnMut(&T) -> bool>(&self, pivot: &T, visit: F) {
        self.walk(Direction::Descend, None, Some(pivot), false, visit);
    }

    // ========================================================================
    // Public API: Info
    // ========================================================================

    /// Number of items stored.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Alias of [`BTree::len`].
    pub fn size(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of levels; 0 for an empty tree.
    pub fn height(&self) -> usize {
        let Some(mut id) = self.root else {
            return 0;
        };
        let mut height = 1;
        while let Some(&first) = self.nodes.node(id).children.first() {
            id = first;
            height += 1;
        }
        height
    }

    /// Number of nodes currently making up the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.live()
    }

    /// The pool this tree takes its nodes from.
    pub fn pool(&self) -> &Arc<NodePool<T>> {
        self.nodes.pool()
    }

    /// Verify the structural invariants of the whole tree.
    ///
    /// Checks node fill bounds, child counts, ordering within and across
    /// nodes, uniform leaf depth and the stored length.
    ///
    /// # Errors
    /// - `Error::InvariantViolation` naming the first offending node
    pub fn check_invariants(&self) -> Result<()> {
        let Some(root) = self.root else {
            if self.length != 0 {
                return Err(Error::InvariantViolation {
                    node: NodeId::new(0),
                    reason: format!("empty tree reports length {}", self.length),
                });
            }
            return Ok(());
        };

        let mut leaf_depth = None;
        let count = self.check_node(root, None, None, 0, &mut leaf_depth)?;
        if count != self.length {
            return Err(Error::InvariantViolation {
                node: root,
                reason: format!("holds {} items but length is {}", count, self.length),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn max_items(&self) -> usize {
        max_items(self.degree)
    }

    fn min_items(&self) -> usize {
        min_items(self.degree)
    }

    /// Split a saturated root under a new root. Returns the new root.
    fn promote_root(&mut self, old_root: NodeId) -> NodeId {
        let split_at = self.max_items() / 2;
        let (median, second) = self.nodes.split(old_root, split_at);

        let new_root = self.nodes.alloc();
        let node = self.nodes.node_mut(new_root);
        node.items.push(median);
        node.children.push(old_root);
        node.children.push(second);

        self.root = Some(new_root);
        tracing::trace!(%old_root, %new_root, "root full, promoted new root");
        new_root
    }

    fn delete_item(&mut self, target: Removal<'_, T>) -> Option<T> {
        let root = self.root?;
        let min_items = self.min_items();
        let out = self.nodes.remove(root, target, min_items);

        let node = self.nodes.node(root);
        if node.items.is_empty() {
            if let Some(&child) = node.children.first() {
                self.root = Some(child);
                self.nodes.free(root);
                tracing::trace!(old_root = %root, new_root = %child, "root emptied, demoted");
            } else {
                self.root = None;
                self.nodes.free(root);
                tracing::trace!(old_root = %root, "last item removed, tree is empty");
            }
        }

        if out.is_some() {
            self.length -= 1;
        }
        out
    }

    fn walk<F: FnMut(&T) -> bool>(
        &self,
        dir: Direction,
        start: Option<&T>,
        stop: Option<&T>,
        include_start: bool,
        mut visit: F,
    ) {
        let Some(root) = self.root else {
            return;
        };
        let bounds = Bounds {
            start,
            stop,
            include_start,
        };
        self.nodes.iterate(root, dir, &bounds, false, &mut visit);
    }

    /// Check the subtree at `id`, whose items must lie strictly between
    /// `lower` and `upper`. Returns the number of items in it.
    fn check_node(
        &self,
        id: NodeId,
        lower: Option<&T>,
        upper: Option<&T>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> Result<usize> {
        let violation = |reason: String| Error::InvariantViolation { node: id, reason };
        let node = self.nodes.node(id);
        let len = node.items.len();
        let is_root = Some(id) == self.root;

        if len > self.max_items() {
            return Err(violation(format!("{} items exceeds max {}", len, self.max_items())));
        }
        if !is_root && len < self.min_items() {
            return Err(violation(format!("{} items below min {}", len, self.min_items())));
        }
        if is_root && len == 0 {
            return Err(violation("root has no items".to_string()));
        }
        if !node.items.is_sorted() {
            return Err(violation("items out of order".to_string()));
        }
        if let (Some(lower), Some(first)) = (lower, node.items.first()) {
            if first <= lower {
                return Err(violation("item not above parent separator".to_string()));
            }
        }
        if let (Some(upper), Some(last)) = (upper, node.items.last()) {
            if last >= upper {
                return Err(violation("item not below parent separator".to_string()));
            }
        }

        if node.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(violation(format!("leaf at depth {} but expected {}", depth, expected)));
                }
                Some(_) => {}
            }
            return Ok(len);
        }

        if node.children.len() != len + 1 {
            return Err(violation(format!(
                "{} items but {} children",
                len,
                node.children.len()
            )));
        }

        let mut count = len;
        for (i, &child) in node.children.iter().enumerate() {
            let lo = if i == 0 { lower } else { Some(&node.items[i - 1]) };
            let hi = if i == len { upper } else { Some(&node.items[i]) };
            count += self.check_node(child, lo, hi, depth + 1, leaf_depth)?;
        }
        Ok(count)
    }
}

impl<T: Ord> Extend<T> for BTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert_or_replace(item);
        }
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for BTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        self.ascend(|item| {
            set.entry(item);
            true
        });
        set.finish()
    }
}
