//! banksafe - Deadlock-avoidance resource allocator
//!
//! Implements the Banker's algorithm for a fixed set of processes sharing
//! a fixed set of reusable resource types.
//!
//! # Architecture
//!
//! The core is two pure functions over an explicit state value:
//! - `check_safety` searches for an order in which every process can finish
//! - `adjudicate` applies a request to a copy of the state and commits it
//!   only if the copy is still safe
//!
//! # Modules
//!
//! - `core`: Safety checker, adjudicator, bank session, scenarios
//! - `domain`: Data structures (SystemSnapshot, results, errors)
//! - `config`: Initial state from YAML
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Check the configured state
//! banksafe check
//!
//! # Ask for [1, 0, 2] on behalf of P1
//! banksafe request 1 1 0 2
//!
//! # Replay a scenario
//! banksafe simulate scenarios/classic.yaml
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{adjudicate, check_safety, Bank, Scenario};
pub use domain::{AdjudicationResult, AllocError, Reason, SafetyResult, SystemSnapshot};
