//! Request adjudication.
//!
//! A request is checked against the process's remaining need, then against
//! the free pool. If both hold, it is applied to a private copy of the
//! snapshot and that copy is committed only when the safety checker
//! accepts it; otherwise the original snapshot is returned untouched.

use tracing::debug;

use crate::domain::{AdjudicationResult, AllocError, Reason, SystemSnapshot};

use super::safety::check_safety;
use super::vector;

/// Decide whether `process` may receive `request` right now
///
/// Malformed input (unknown process, wrong request length) is an `Err`;
/// every policy decision is an `Ok` carrying a [`Reason`].
pub fn adjudicate(
    snapshot: &SystemSnapshot,
    process: usize,
    request: &[u32],
) -> Result<AdjudicationResult, AllocError> {
    validate_request(snapshot, process, request)?;

    if !vector::fits_within(request, &snapshot.need()[process]) {
        debug!(process, ?request, "request exceeds remaining claim");
        return Ok(AdjudicationResult::denied(
            snapshot.clone(),
            Reason::ExceedsMaximumClaim,
            Vec::new(),
        ));
    }

    if !vector::fits_within(request, snapshot.available()) {
        debug!(process, ?request, "request exceeds free pool");
        let current = check_safety(snapshot);
        return Ok(AdjudicationResult::denied(
            snapshot.clone(),
            Reason::InsufficientAvailable,
            current.order,
        ));
    }

    let tentative = snapshot.with_loan(process, request)?;
    let verdict = check_safety(&tentative);

    if verdict.is_safe {
        debug!(process, ?request, order = ?verdict.order, "request committed");
        Ok(AdjudicationResult {
            granted: true,
            snapshot: tentative,
            reason: Reason::Granted,
            order: verdict.order,
        })
    } else {
        debug!(process, ?request, "request rolled back: tentative state unsafe");
        let current = check_safety(snapshot);
        Ok(AdjudicationResult::denied(
            snapshot.clone(),
            Reason::WouldDeadlock,
            current.order,
        ))
    }
}

fn validate_request(snapshot: &SystemSnapshot, process: usize, request: &[u32]) -> Result<(), AllocError> {
    if process >= snapshot.process_count() {
        return Err(AllocError::ProcessOutOfRange {
            process,
            process_count: snapshot.process_count(),
        });
    }
    if request.len() != snapshot.resource_count() {
        return Err(AllocError::RequestLength {
            expected: snapshot.resource_count(),
            actual: request.len(),
        });
    }
    Ok(())
}
