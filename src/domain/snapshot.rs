//! System snapshot: the full allocator state at one instant.
//!
//! A snapshot can only be built through [`SystemSnapshot::new`] (or its
//! serde equivalent), which checks shape, `allocation <= maximum` and that
//! each resource's total supply fits in a `u32`. `need` is always derived.

use serde::{Deserialize, Serialize};

use crate::core::vector;

use super::error::AllocError;

/// Complete allocator state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotParts")]
pub struct SystemSnapshot {
    /// Unallocated units per resource type
    available: Vec<u32>,

    /// Declared maximum demand per process
    maximum: Vec<Vec<u32>>,

    /// Units currently held per process
    allocation: Vec<Vec<u32>>,

    /// `maximum - allocation`, kept in sync on every transition
    need: Vec<Vec<u32>>,
}

/// Caller-supplied inputs of a snapshot (`need` is never accepted)
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotParts {
    pub available: Vec<u32>,
    pub maximum: Vec<Vec<u32>>,
    pub allocation: Vec<Vec<u32>>,
}

impl TryFrom<SnapshotParts> for SystemSnapshot {
    type Error = AllocError;

    fn try_from(parts: SnapshotParts) -> Result<Self, Self::Error> {
        Self::new(parts.available, parts.maximum, parts.allocation)
    }
}

impl SystemSnapshot {
    /// Build a snapshot, deriving `need`
    ///
    /// Zero processes is allowed; zero resource types is not.
    pub fn new(
        available: Vec<u32>,
        maximum: Vec<Vec<u32>>,
        allocation: Vec<Vec<u32>>,
    ) -> Result<Self, AllocError> {
        let resources = available.len();
        if resources == 0 {
            return Err(AllocError::NoResources);
        }

        let processes = maximum.len();
        if allocation.len() != processes {
            return Err(AllocError::RowCount {
                matrix: "allocation",
                expected: processes,
                actual: allocation.len(),
            });
        }

        check_rows("maximum", &maximum, resources)?;
        check_rows("allocation", &allocation, resources)?;

        let mut need = Vec::with_capacity(processes);
        for (process, (max_row, alloc_row)) in maximum.iter().zip(&allocation).enumerate() {
            match vector::checked_sub(max_row, alloc_row) {
                Some(row) => need.push(row),
                None => {
                    // checked_sub only fails where some allocation exceeds its maximum
                    let resource = vector::first_excess(alloc_row, max_row).unwrap_or_default();
                    return Err(AllocError::AllocationExceedsMaximum {
                        process,
                        resource,
                        allocation: alloc_row[resource],
                        maximum: max_row[resource],
                    });
                }
            }
        }

        let mut total = available.clone();
        for row in &allocation {
            total = vector::checked_add(&total, row).ok_or_else(|| {
                let resource = total
                    .iter()
                    .zip(row)
                    .position(|(t, a)| t.checked_add(*a).is_none())
                    .unwrap_or_default();
                AllocError::TotalOverflow { resource }
            })?;
        }

        Ok(Self {
            available,
            maximum,
            allocation,
            need,
        })
    }

    /// Number of processes
    pub fn process_count(&self) -> usize {
        self.maximum.len()
    }

    /// Number of resource types
    pub fn resource_count(&self) -> usize {
        self.available.len()
    }

    pub fn available(&self) -> &[u32] {
        &self.available
    }

    pub fn maximum(&self) -> &[Vec<u32>] {
        &self.maximum
    }

    pub fn allocation(&self) -> &[Vec<u32>] {
        &self.allocation
    }

    pub fn need(&self) -> &[Vec<u32>] {
        &self.need
    }

    /// Total supply per resource type (`available + sum of allocations`)
    pub fn totals(&self) -> Vec<u32> {
        let mut total = self.available.clone();
        for row in &self.allocation {
            vector::add_assign(&mut total, row);
        }
        total
    }

    /// Copy of this snapshot with `request` moved from `available` to `process`
    ///
    /// Only the available vector and the process's allocation and need rows
    /// differ from `self`. The caller has already checked that the request
    /// fits within both need and available; an underflow here means the
    /// snapshot was corrupted.
    pub(crate) fn with_loan(&self, process: usize, request: &[u32]) -> Result<Self, AllocError> {
        let available = vector::checked_sub(&self.available, request).ok_or_else(|| {
            AllocError::InvariantViolation {
                detail: format!("available would go negative granting process {}", process),
            }
        })?;
        let need = vector::checked_sub(&self.need[process], request).ok_or_else(|| {
            AllocError::InvariantViolation {
                detail: format!("need of process {} would go negative", process),
            }
        })?;
        let allocation = vector::checked_add(&self.allocation[process], request).ok_or_else(|| {
            AllocError::InvariantViolation {
                detail: format!("allocation of process {} overflowed", process),
            }
        })?;

        let mut tentative = self.clone();
        tentative.available = available;
        tentative.allocation[process] = allocation;
        tentative.need[process] = need;
        Ok(tentative)
    }
}

fn check_rows(matrix: &'static str, rows: &[Vec<u32>], resources: usize) -> Result<(), AllocError> {
    for (process, row) in rows.iter().enumerate() {
        if row.len() != resources {
            return Err(AllocError::RowLength {
                matrix,
                process,
                expected: resources,
                actual: row.len(),
            });
        }
    }
    Ok(())
}
