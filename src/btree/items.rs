//! Ordered item list - the sorted sequence stored in every node.

use std::cmp::Ordering;
use std::ops::Index;

/// A sorted list of items held by a single node.
///
/// No two equal items ever coexist: callers use [`Items::find`] first and
/// replace on a hit instead of inserting.
#[derive(Debug)]
pub(crate) struct Items<T> {
    items: Vec<T>,
}

impl<T> Items<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Insert a value at `index`, pushing all subsequent values forward.
    pub fn insert_at(&mut self, index: usize, item: T) {
        self.items.insert(index, item);
    }

    /// Remove the value at `index`, pulling all subsequent values back.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    /// Put `item` at `index` and hand back the value it replaced.
    pub fn replace(&mut self, index: usize, item: T) -> T {
        std::mem::replace(&mut self.items[index], item)
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Keep only the first `index` items, dropping the rest.
    ///
    /// `index` must be less than or equal to the length.
    pub fn truncate(&mut self, index: usize) {
        debug_assert!(index <= self.items.len());
        self.items.truncate(index);
    }

    /// Move every item from `at` onwards to the end of `dst`.
    pub fn move_tail(&mut self, at: usize, dst: &mut Items<T>) {
        dst.items.extend(self.items.drain(at..));
    }

    /// Move all items of `other` to the end of this list, leaving it empty.
    pub fn append(&mut self, other: &mut Items<T>) {
        self.items.append(&mut other.items);
    }
}

impl<T: Ord> Items<T> {
    /// Binary search for `item`.
    ///
    /// Returns the index where `item` is or would be inserted, and whether an
    /// equal item is already stored at that index.
    pub fn find(&self, item: &T) -> (usize, bool) {
        match self.items.binary_search_by(|probe| probe.cmp(item)) {
            Ok(index) => (index, true),
            Err(index) => (index, false),
        }
    }

    /// Whether the list is strictly increasing.
    pub fn is_sorted(&self) -> bool {
        self.items
            .windows(2)
            .all(|pair| pair[0].cmp(&pair[1]) == Ordering::Less)
    }
}

impl<T> Default for Items<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Items<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}
