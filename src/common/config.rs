//! Configuration constants for the B-tree and its node pool.

/// Number of recycled node shells a pool keeps by default.
///
/// Trees built with [`BTree::new`](crate::BTree::new) get a private pool of
/// this size. Shells beyond this count are dropped on release instead of
/// being kept around.
pub const DEFAULT_FREE_LIST_SIZE: usize = 32;

/// Smallest degree a tree can be built with.
///
/// With degree `d` every non-root node holds between `d - 1` and `2d - 1`
/// items, so `d = 2` gives the classic 2-3-4 tree.
pub const MIN_DEGREE: usize = 2;

/// Maximum number of items a node may hold for the given degree.
#[inline]
pub const fn max_items(degree: usize) -> usize {
    degree * 2 - 1
}

/// Minimum number of items a non-root node may hold for the given degree.
#[inline]
pub const fn min_items(degree: usize) -> usize {
    degree - 1
}
