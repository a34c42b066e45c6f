//! Results returned by the safety checker and the request adjudicator.

use serde::{Deserialize, Serialize};

use super::snapshot::SystemSnapshot;

/// Outcome of a safety check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyResult {
    /// Whether every process can run to completion
    pub is_safe: bool,

    /// Completion order discovered by the simulation (partial when unsafe)
    pub order: Vec<usize>,
}

/// Why a request was granted or denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Tentative state was safe and has been committed
    Granted,

    /// Request asks for more than the process's remaining need
    ExceedsMaximumClaim,

    /// Not enough free units right now; the process must wait
    InsufficientAvailable,

    /// Granting would leave the system in an unsafe state
    WouldDeadlock,
}

impl Reason {
    /// Human-readable description of this outcome for `process`
    pub fn message(self, process: usize) -> String {
        match self {
            Reason::Granted => format!(
                "Loan for Process {} granted. The system is in a safe state.",
                process
            ),
            Reason::ExceedsMaximumClaim => format!(
                "Process {} has exceeded its maximum claim. Request cannot be granted.",
                process
            ),
            Reason::InsufficientAvailable => format!(
                "Request denied for Process {}. Resources not available. Process must wait.",
                process
            ),
            Reason::WouldDeadlock => format!(
                "Request for Process {} denied. Granting it would lead to an unsafe state.",
                process
            ),
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Reason::Granted => "granted",
            Reason::ExceedsMaximumClaim => "exceeds_maximum_claim",
            Reason::InsufficientAvailable => "insufficient_available",
            Reason::WouldDeadlock => "would_deadlock",
        };
        f.write_str(s)
    }
}

/// Decision on a single resource request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicationResult {
    /// True only for [`Reason::Granted`]
    pub granted: bool,

    /// State after the decision (unchanged input when denied)
    pub snapshot: SystemSnapshot,

    pub reason: Reason,

    /// Safe sequence for display: the committed state's when granted,
    /// the current state's otherwise (empty for an excessive claim)
    pub order: Vec<usize>,
}

impl AdjudicationResult {
    pub(crate) fn denied(snapshot: SystemSnapshot, reason: Reason, order: Vec<usize>) -> Self {
        Self {
            granted: false,
            snapshot,
            reason,
            order,
        }
    }
}
