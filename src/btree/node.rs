//! Node - a B-tree node and the node-level algorithms.
//!
//! Nodes live in a [`NodeArena`] and refer to their children by handle, so
//! every algorithm here is a method on the arena taking the [`NodeId`] of the
//! node it works on.

use std::cmp::Ordering;

use crate::btree::arena::NodeArena;
use crate::btree::items::Items;
use crate::common::NodeId;

/// A single tree node.
///
/// A leaf has no children. An internal node with `k` items has exactly
/// `k + 1` children, and `children[i]` holds items strictly between
/// `items[i - 1]` and `items[i]`.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub items: Items<T>,
    pub children: Vec<NodeId>,
}

impl<T> Node<T> {
    pub fn new() -> Self {
        Self {
            items: Items::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// What [`NodeArena::remove`] should take out of a subtree.
pub(crate) enum Removal<'a, T> {
    /// The item equal to the given key.
    Item(&'a T),
    /// The smallest item.
    Min,
    /// The largest item.
    Max,
}

impl<T> Clone for Removal<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Removal<'_, T> {}

impl<T: Ord> NodeArena<T> {
    /// Split node `id` at item `i`.
    ///
    /// The node keeps items `[0, i)` and children `[0, i]`. Returns the item
    /// at `i` and a new right sibling holding everything after it.
    pub(crate) fn split(&mut self, id: NodeId, i: usize) -> (T, NodeId) {
        let next = self.alloc();
        let (node, sibling) = self.pair_mut(id, next);

        node.items.move_tail(i + 1, &mut sibling.items);
        let Some(item) = node.items.pop() else {
            unreachable!("split index {} out of range", i);
        };
        if !node.is_leaf() {
            sibling.children.extend(node.children.drain(i + 1..));
        }

        (item, next)
    }

    /// Split child `i` of node `id` if it is full. Returns whether it split.
    fn maybe_split_child(&mut self, id: NodeId, i: usize, max_items: usize) -> bool {
        let child = self.node(id).children[i];
        if self.node(child).items.len() < max_items {
            return false;
        }

        let (item, second) = self.split(child, max_items / 2);
        let node = self.node_mut(id);
        node.items.insert_at(i, item);
        node.children.insert(i + 1, second);
        true
    }

    /// Insert `item` into the subtree rooted at `id`.
    ///
    /// Full children are split on the way down, so the caller only has to make
    /// sure `id` itself has room. Returns the replaced item if an equal one
    /// was already present.
    pub(crate) fn insert(&mut self, id: NodeId, item: T, max_items: usize) -> Option<T> {
        let mut id = id;

        loop {
            let (mut i, found) = self.node(id).items.find(&item);
            if found {
                return Some(self.node_mut(id).items.replace(i, item));
            }

            if self.node(id).is_leaf() {
                self.node_mut(id).items.insert_at(i, item);
                return None;
            }

            if self.maybe_split_child(id, i, max_items) {
                match item.cmp(&self.node(id).items[i]) {
                    Ordering::Less => {}
                    Ordering::Greater => i += 1,
                    Ordering::Equal => return Some(self.node_mut(id).items.replace(i, item)),
                }
            }

            id = self.node(id).children[i];
        }
    }

    /// Remove an item from the subtree rooted at `id`.
    ///
    /// Before descending, the target child is grown past `min_items` so the
    /// removal can never leave it underfull.
    pub(crate) fn remove(&mut self, id: NodeId, target: Removal<'_, T>, min_items: usize) -> Option<T> {
        let node = self.node_mut(id);
        let leaf = node.is_leaf();

        let (i, found) = match target {
            Removal::Max => {
                if leaf {
                    return node.items.pop();
                }
                (node.items.len(), false)
            }
            Removal::Min => {
                if leaf {
                    return (!node.items.is_empty()).then(|| node.items.remove_at(0));
                }
                (0, false)
            }
            Removal::Item(key) => {
                let (i, found) = node.items.find(key);
                if leaf {
                    return found.then(|| node.items.remove_at(i));
                }
                (i, found)
            }
        };

        let child = self.node(id).children[i];
        if self.node(child).items.len() <= min_items {
            return self.grow_child_and_remove(id, i, target, min_items);
        }

        if found {
            // Swap in the predecessor from the left child
            let Some(predecessor) = self.remove(child, Removal::Max, min_items) else {
                unreachable!("non-minimal child {} has no items", child);
            };
            return Some(self.node_mut(id).items.replace(i, predecessor));
        }

        self.remove(child, target, min_items)
    }

    /// Grow child `i` of `id` past `min_items`, then retry the removal on `id`.
    ///
    /// Tries, in order: rotate an item in from the left sibling, rotate one in
    /// from the right sibling, merge with a sibling. After any of these the
    /// retry finds a child with items to spare.
    fn grow_child_and_remove(
        &mut self,
        id: NodeId,
        i: usize,
        target: Removal<'_, T>,
        min_items: usize,
    ) -> Option<T> {
        let node = self.node(id);
        let item_count = node.items.len();

        if i > 0 && self.node(node.children[i - 1]).items.len() > min_items {
            self.steal_from_left(id, i);
        } else if i < item_count && self.node(node.children[i + 1]).items.len() > min_items {
            self.steal_from_right(id, i);
        } else {
            let left = if i >= item_count { i - 1 } else { i };
            self.merge_children(id, left);
        }

        self.remove(id, target, min_items)
    }

    fn steal_from_left(&mut self, id: NodeId, i: usize) {
        let child = self.node(id).children[i];
        let left = self.node(id).children[i - 1];

        let donor = self.node_mut(left);
        let Some(stolen) = donor.items.pop() else {
            unreachable!("left sibling {} has no surplus", left);
        };
        let stolen_child = donor.children.pop();

        let separator = self.node_mut(id).items.replace(i - 1, stolen);
        let target = self.node_mut(child);
        target.items.insert_at(0, separator);
        if let Some(grandchild) = stolen_child {
            target.children.insert(0, grandchild);
        }
    }

    fn steal_from_right(&mut self, id: NodeId, i: usize) {
        let child = self.node(id).children[i];
        let right = self.node(id).children[i + 1];

        let donor = self.node_mut(right);
        let stolen = donor.items.remove_at(0);
        let stolen_child = (!donor.is_leaf()).then(|| donor.children.remove(0));

        let separator = self.node_mut(id).items.replace(i, stolen);
        let target = self.node_mut(child);
        target.items.push(separator);
        if let Some(grandchild) = stolen_child {
            target.children.push(grandchild);
        }
    }

    /// Fold child `i + 1` and the separator between them into child `i`.
    fn merge_children(&mut self, id: NodeId, i: usize) {
        let node = self.node_mut(id);
        let separator = node.items.remove_at(i);
        let right = node.children.remove(i + 1);
        let left = node.children[i];

        let (left_node, right_node) = self.pair_mut(left, right);
        left_node.items.push(separator);
        left_node.items.append(&mut right_node.items);
        left_node.children.append(&mut right_node.children);

        self.free(right);
    }

    /// Find the item equal to `key` in the subtree rooted at `id`.
    pub(crate) fn get(&self, id: NodeId, key: &T) -> Option<&T> {
        let mut node = self.node(id);

        loop {
            let (i, found) = node.items.find(key);
            if found {
                return Some(&node.items[i]);
            }
            if node.is_leaf() {
                return None;
            }
            node = self.node(node.children[i]);
        }
    }

    /// Smallest item in the subtree rooted at `id`.
    pub(crate) fn min(&self, id: NodeId) -> Option<&T> {
        let mut node = self.node(id);
        while let Some(&first) = node.children.first() {
            node = self.node(first);
        }
        node.items.first()
    }

    /// Largest item in the subtree rooted at `id`.
    pub(crate) fn max(&self, id: NodeId) -> Option<&T> {
        let mut node = self.node(id);
        while let Some(&last) = node.children.last() {
            node = self.node(last);
        }
        node.items.last()
    }
}
