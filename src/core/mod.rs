//! Core allocation logic.
//!
//! This module contains:
//! - Safety: The safety checker (safe-sequence search)
//! - Adjudicator: Tentative apply, check, commit or roll back
//! - Bank: A session holding the current state across requests
//! - Scenario: Scripted request sequences loaded from YAML
//! - Vector: Element-wise resource arithmetic

pub mod adjudicator;
pub mod bank;
pub mod safety;
pub mod scenario;
pub mod vector;

// Re-export commonly used types
pub use adjudicator::adjudicate;
pub use bank::{default_resource_names, Bank};
pub use safety::check_safety;
pub use scenario::{Scenario, ScenarioStep, StepReport};
