//! Validation and invariant errors for allocator state.
//!
//! Policy outcomes (a request that must wait or would deadlock) are not
//! errors; they are reported through [`Reason`](super::outcome::Reason).

use thiserror::Error;

/// Errors raised when a snapshot or request is malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("At least one resource type is required")]
    NoResources,

    #[error("{matrix} has {actual} rows, expected {expected}")]
    RowCount {
        matrix: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{matrix} row for process {process} has {actual} entries, expected {expected}")]
    RowLength {
        matrix: &'static str,
        process: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Allocation exceeds maximum for process {process}, resource {resource}: {allocation} > {maximum}"
    )]
    AllocationExceedsMaximum {
        process: usize,
        resource: usize,
        allocation: u32,
        maximum: u32,
    },

    #[error("Total supply of resource {resource} does not fit in 32 bits")]
    TotalOverflow { resource: usize },

    #[error("Process {process} is out of range (process count is {process_count})")]
    ProcessOutOfRange { process: usize, process_count: usize },

    #[error("Request has {actual} entries, expected {expected}")]
    RequestLength { expected: usize, actual: usize },

    #[error("Snapshot invariant violated: {detail}")]
    InvariantViolation { detail: String },
}
