//! Domain types for the banksafe allocator.
//!
//! This module contains the core data structures:
//! - SystemSnapshot: Allocator state (available, maximum, allocation, need)
//! - Outcome: Safety and adjudication results, reason codes
//! - Error: Validation and invariant errors

pub mod error;
pub mod outcome;
pub mod snapshot;

// Re-export commonly used types
pub use error::AllocError;
pub use outcome::{AdjudicationResult, Reason, SafetyResult};
pub use snapshot::{SnapshotParts, SystemSnapshot};
