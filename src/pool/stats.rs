//! Node pool statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics tracked by a node pool.
///
/// All fields are atomic so trees on different threads can share one pool
/// without the counters needing the free-list lock.
///
/// # Memory Ordering
/// We use `Ordering::Relaxed` for all operations because:
/// - We only need atomicity (no partial updates)
/// - We don't need synchronization between different counters
///
/// # Example
/// ```
/// use pooled_btree::PoolStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = PoolStats::new();
/// stats.reused.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.reused.load(Ordering::Relaxed), 1);
/// ```
#[derive(Debug)]
pub struct PoolStats {
    /// Number of shells created because the free list was empty.
    pub allocated: AtomicU64,

    /// Number of shells handed out from the free list.
    pub reused: AtomicU64,

    /// Number of shells returned and kept for later reuse.
    pub released: AtomicU64,

    /// Number of shells dropped because the pool was at capacity.
    pub discarded: AtomicU64,
}

impl PoolStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            allocated: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            released: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    /// Fraction of acquisitions served from the free list (0.0 to 1.0).
    pub fn reuse_rate(&self) -> f64 {
        self.snapshot().reuse_rate()
    }

    /// Get a non-atomic copy of the current counters.
    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            allocated: self.allocated.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.allocated.store(0, Ordering::Relaxed);
        self.reused.store(0, Ordering::Relaxed);
        self.released.store(0, Ordering::Relaxed);
        self.discarded.store(0, Ordering::Relaxed);
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of node pool statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatsSnapshot {
    pub allocated: u64,
    pub reused: u64,
    pub released: u64,
    pub discarded: u64,
}

impl PoolStatsSnapshot {
    /// Total number of shells handed out by the pool.
    pub fn acquired(&self) -> u64 {
        self.allocated + self.reused
    }

    /// Fraction of acquisitions served from the free list (0.0 to 1.0).
    pub fn reuse_rate(&self) -> f64 {
        let total = self.acquired();
        if total == 0 {
            0.0
        } else {
            self.reused as f64 / total as f64
        }
    }
}

impl fmt::Display for PoolStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PoolStats {{ allocated: {}, reused: {}, released: {}, discarded: {}, reuse_rate: {:.2}% }}",
            self.allocated,
            self.reused,
            self.released,
            self.discarded,
            self.reuse_rate() * 100.0
        )
    }
}
