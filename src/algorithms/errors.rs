//! Input validation errors shared by every trace producer
//!
//! Producers check their input before recording anything. A failure never
//! escapes the producer: it becomes the single step of a rejected
//! [`Trace`](crate::trace::Trace), and is also available through
//! [`Trace::rejection`](crate::trace::Trace::rejection).

use thiserror::Error;

/// Reasons a producer refuses its input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An operation refers to an element that does not exist
    #[error("index {index} is out of range for {what} of size {len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// An edge or start vertex refers to a vertex that does not exist
    #[error("vertex {vertex} does not exist (graph has {count} vertices)")]
    InvalidVertex { vertex: usize, count: usize },

    /// A value that must be non-negative is not
    #[error("value {value} at position {index} must not be negative")]
    NegativeValue { index: usize, value: i64 },

    /// The same edge is listed twice
    #[error("edge {from}-{to} is listed more than once")]
    DuplicateEdge { from: usize, to: usize },

    /// A heap handed to an operation violates the min-heap property
    #[error("not a min-heap: element {child} at index {index} is smaller than its parent {parent}")]
    NotAHeap { index: usize, child: i64, parent: i64 },

    /// Input is larger than the producer is willing to trace
    #[error("{what} of {size} exceeds the limit of {max}")]
    TooLarge {
        what: &'static str,
        size: usize,
        max: usize,
    },

    /// Bucket sort needs at least one bucket
    #[error("bucket count must be at least 1")]
    ZeroBuckets,

    /// Hash table needs at least one slot
    #[error("hash table capacity must be at least 1")]
    ZeroCapacity,

    /// A tree node has no parent in level-order form
    #[error("node at position {index} has no parent")]
    OrphanNode { index: usize },
}

/// Reject sizes above `max`
pub(crate) fn check_limit(
    what: &'static str,
    size: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if size > max {
        return Err(ValidationError::TooLarge { what, size, max });
    }
    Ok(())
}

/// Reject indices outside `0..len`
pub(crate) fn check_index(
    what: &'static str,
    index: usize,
    len: usize,
) -> Result<(), ValidationError> {
    if index >= len {
        return Err(ValidationError::IndexOutOfRange { what, index, len });
    }
    Ok(())
}
