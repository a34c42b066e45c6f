//! Safety checker.
//!
//! Simulates processes running to completion one at a time: a process
//! whose remaining need fits in the working pool finishes and returns its
//! allocation to the pool. Passes scan processes in ascending index order
//! and repeat until everyone has finished or a pass makes no progress.

use tracing::debug;

use crate::domain::{SafetyResult, SystemSnapshot};

use super::vector;

/// Decide whether `snapshot` is safe and report the completion order found
pub fn check_safety(snapshot: &SystemSnapshot) -> SafetyResult {
    let processes = snapshot.process_count();
    let need = snapshot.need();
    let allocation = snapshot.allocation();

    let mut work = snapshot.available().to_vec();
    let mut finished = vec![false; processes];
    let mut order = Vec::with_capacity(processes);

    let mut progressed = true;
    while order.len() < processes && progressed {
        progressed = false;
        for p in 0..processes {
            if !finished[p] && vector::fits_within(&need[p], &work) {
                vector::add_assign(&mut work, &allocation[p]);
                finished[p] = true;
                order.push(p);
                progressed = true;
            }
        }
    }

    let is_safe = order.len() == processes;
    debug!(is_safe, ?order, "safety check");

    SafetyResult { is_safe, order }
}
