//! Error types for the B-tree.

use thiserror::Error;

use crate::common::config::MIN_DEGREE;
use crate::common::NodeId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All recoverable errors reported by the crate.
///
/// Lookups and deletions never fail: a missing key is `None`, not an error.
/// What remains are construction mistakes and structural checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The requested degree is below the minimum a B-tree can work with.
    #[error("Invalid degree {degree}: must be at least {}", MIN_DEGREE)]
    InvalidDegree { degree: usize },

    /// A structural invariant does not hold.
    ///
    /// This indicates a bug in the tree itself and is only ever produced by
    /// [`BTree::check_invariants`](crate::BTree::check_invariants).
    #[error("Invariant violated at {node}: {reason}")]
    InvariantViolation { node: NodeId, reason: String },
}
