//! Error types for capacity management and insertion.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure to change the capacity of the entry buffer. The container is
/// left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapacityError {
    #[error("requested capacity {requested} is below the live length {len}")]
    BelowLength { requested: usize, len: usize },

    #[error("capacity computation overflowed")]
    Overflow,

    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}

/// Failure to insert. Nothing was written and no entry moved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    #[error("insert position {pos} is past the end (len {len})")]
    OutOfBounds { pos: usize, len: usize },

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

impl InsertError {
    /// True if the insert was rejected because of its position rather than
    /// because the buffer could not grow.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, InsertError::OutOfBounds { .. })
    }
}
