//! Range iterator - bounded in-order traversal in either direction.
//!
//! Every public scan on [`BTree`](crate::BTree) is one call to
//! [`NodeArena::iterate`] with different bounds. Descending order is the
//! ascending walk mirrored through [`Direction`], so both directions share
//! the same boundary handling.

use std::cmp::Ordering;

use crate::btree::arena::NodeArena;
use crate::common::NodeId;

/// Traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Ascend,
    Descend,
}

impl Direction {
    /// Whether `a` comes strictly before `b` in this direction.
    #[inline]
    fn before<T: Ord>(self, a: &T, b: &T) -> bool {
        match self {
            Direction::Ascend => a.cmp(b) == Ordering::Less,
            Direction::Descend => a.cmp(b) == Ordering::Greater,
        }
    }
}

/// Bounds for one traversal.
///
/// `start` is the first value of interest in traversal order and `stop` the
/// exclusive end. With `include_start` unset, an item equal to `start` is
/// skipped, which turns "from" into "strictly after".
pub(crate) struct Bounds<'a, T> {
    pub start: Option<&'a T>,
    pub stop: Option<&'a T>,
    pub include_start: bool,
}

/// Outcome of visiting one subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Traversal {
    /// Whether an item at or past `start` has been reached. Carried across
    /// subtrees so an exclusive `start` is skipped only once.
    pub hit: bool,
    /// `false` once the visitor declined or `stop` was reached.
    pub more: bool,
}

impl<T: Ord> NodeArena<T> {
    /// Walk the subtree rooted at `id` in `dir` order, calling `visit` on
    /// every item within `bounds` until it returns `false`.
    pub(crate) fn iterate<F>(
        &self,
        id: NodeId,
        dir: Direction,
        bounds: &Bounds<'_, T>,
        mut hit: bool,
        visit: &mut F,
    ) -> Traversal
    where
        F: FnMut(&T) -> bool,
    {
        let node = self.node(id);
        let len = node.items.len();

        for step in 0..len {
            // Item index and the child that precedes it in traversal order
            let (i, child) = match dir {
                Direction::Ascend => (step, step),
                Direction::Descend => (len - 1 - step, len - step),
            };
            let item = &node.items[i];

            if let Some(start) = bounds.start {
                if dir.before(item, start) {
                    continue;
                }
                let at_start = item.cmp(start) == Ordering::Equal;
                if !bounds.include_start && !hit && at_start {
                    hit = true;
                    continue;
                }
                if !(bounds.include_start && at_start) && !node.is_leaf() {
                    let t = self.iterate(node.children[child], dir, bounds, hit, visit);
                    if !t.more {
                        return t;
                    }
                    hit = t.hit;
                }
            } else if !node.is_leaf() {
                let t = self.iterate(node.children[child], dir, bounds, hit, visit);
                if !t.more {
                    return t;
                }
                hit = t.hit;
            }

            if let Some(stop) = bounds.stop {
                if !dir.before(item, stop) {
                    return Traversal { hit, more: false };
                }
            }

            hit = true;
            if !visit(item) {
                return Traversal { hit, more: false };
            }
        }

        if !node.is_leaf() {
            let last = match dir {
                Direction::Ascend => len,
                Direction::Descend => 0,
            };
            let t = self.iterate(node.children[last], dir, bounds, hit, visit);
            if !t.more {
                return t;
            }
            hit = t.hit;
        }

        Traversal { hit, more: true }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pool::NodePool;

    /// Two-level tree over 0..=8: root [2, 5] with leaves [0, 1], [3, 4], [6, 7, 8].
    fn sample() -> (NodeArena<i32>, NodeId) {
        let mut arena = NodeArena::new(Arc::new(NodePool::new(8)));
        let mut leaf = |values: &[i32]| {
            let id = arena.alloc();
            for &v in values {
                arena.node_mut(id).items.push(v);
            }
            id
        };
        let a = leaf(&[0, 1]);
        let b = leaf(&[3, 4]);
        let c = leaf(&[6, 7, 8]);
        let root = leaf(&[2, 5]);
        arena.node_mut(root).children.extend([a, b, c]);
        (arena, root)
    }

    fn collect(
        dir: Direction,
        start: Option<i32>,
        stop: Option<i32>,
        include_start: bool,
    ) -> Vec<i32> {
        let (arena, root) = sample();
        let bounds = Bounds {
            start: start.as_ref(),
            stop: stop.as_ref(),
            include_start,
        };
        let mut out = vec![];
        arena.iterate(root, dir, &bounds, false, &mut |v: &i32| {
            out.push(*v);
            true
        });
        out
    }

    #[test]
    fn test_full_scan_both_directions() {
        assert_eq!(collect(Direction::Ascend, None, None, false), (0..=8).collect::<Vec<_>>());
        assert_eq!(
            collect(Direction::Descend, None, None, false),
            (0..=8).rev().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_inclusive_start_on_separator() {
        assert_eq!(collect(Direction::Ascend, Some(5), None, true), vec![5, 6, 7, 8]);
        assert_eq!(collect(Direction::Descend, Some(5), None, true), vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_exclusive_start_skips_equal_item() {
        assert_eq!(collect(Direction::Ascend, Some(2), None, false), vec![3, 4, 5, 6, 7, 8]);
        assert_eq!(collect(Direction::Ascend, Some(4), None, false), vec![5, 6, 7, 8]);
        assert_eq!(collect(Direction::Descend, Some(5), None, false), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_stop_is_exclusive() {
        assert_eq!(collect(Direction::Ascend, Some(1), Some(6), true), vec![1, 2, 3, 4, 5]);
        assert_eq!(collect(Direction::Descend, Some(7), Some(2), true), vec![7, 6, 5, 4, 3]);
        assert_eq!(collect(Direction::Ascend, None, Some(0), false), Vec::<i32>::new());
    }

    #[test]
    fn test_visitor_abort_stops_everything() {
        let (arena, root) = sample();
        let bounds = Bounds {
            start: None,
            stop: None,
            include_start: false,
        };
        let mut seen = vec![];
        let t = arena.iterate(root, Direction::Ascend, &bounds, false, &mut |v: &i32| {
            seen.push(*v);
            *v < 3
        });

        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(!t.more);
        assert!(t.hit);
    }
}
