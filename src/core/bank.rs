//! Bank session: one mutable snapshot with requests applied in turn.
//!
//! `request` takes `&mut self`, so at most one adjudication is in flight
//! against the current snapshot.

use anyhow::Result;
use tracing::{info, instrument, warn};

use crate::domain::{AdjudicationResult, AllocError, Reason, SafetyResult, SystemSnapshot};

use super::adjudicator::adjudicate;
use super::safety::check_safety;

/// Allocator session over a configured initial state
#[derive(Debug, Clone)]
pub struct Bank {
    /// State the session was configured with (restored by `reset`)
    initial: SystemSnapshot,

    /// Latest committed state
    current: SystemSnapshot,

    /// Display name of each resource type
    resource_names: Vec<String>,

    granted: u64,
    denied: u64,
}

impl Bank {
    /// Open a session; `resource_names` must have one entry per resource type
    pub fn new(snapshot: SystemSnapshot, resource_names: Vec<String>) -> Result<Self> {
        if resource_names.len() != snapshot.resource_count() {
            anyhow::bail!(
                "Expected {} resource names, got {}",
                snapshot.resource_count(),
                resource_names.len()
            );
        }

        Ok(Self::open(snapshot, resource_names))
    }

    /// Open a session with default names (`A`, `B`, `C`, ...)
    pub fn with_default_names(snapshot: SystemSnapshot) -> Self {
        let resource_names = default_resource_names(snapshot.resource_count());
        Self::open(snapshot, resource_names)
    }

    /// Callers guarantee one name per resource type
    fn open(snapshot: SystemSnapshot, resource_names: Vec<String>) -> Self {
        Self {
            initial: snapshot.clone(),
            current: snapshot,
            resource_names,
            granted: 0,
            denied: 0,
        }
    }

    pub fn snapshot(&self) -> &SystemSnapshot {
        &self.current
    }

    pub fn initial(&self) -> &SystemSnapshot {
        &self.initial
    }

    pub fn resource_names(&self) -> &[String] {
        &self.resource_names
    }

    /// Number of requests granted since the session opened or was reset
    pub fn requests_granted(&self) -> u64 {
        self.granted
    }

    /// Number of requests denied since the session opened or was reset
    pub fn requests_denied(&self) -> u64 {
        self.denied
    }

    /// Safety of the current state
    pub fn status(&self) -> SafetyResult {
        let result = check_safety(&self.current);
        if result.is_safe {
            info!(order = ?result.order, "Current state is safe");
        } else {
            warn!(finished = ?result.order, "Current state is unsafe");
        }
        result
    }

    /// Adjudicate a request and adopt the resulting state
    #[instrument(skip(self, request), fields(request = ?request))]
    pub fn request(&mut self, process: usize, request: &[u32]) -> Result<AdjudicationResult, AllocError> {
        let result = adjudicate(&self.current, process, request)?;

        match result.reason {
            Reason::Granted => {
                self.granted += 1;
                info!(order = ?result.order, "Request granted");
            }
            Reason::ExceedsMaximumClaim => {
                self.denied += 1;
                warn!("Request exceeds maximum claim");
            }
            Reason::InsufficientAvailable => {
                self.denied += 1;
                info!("Request must wait for resources");
            }
            Reason::WouldDeadlock => {
                self.denied += 1;
                warn!("Request denied: would lead to an unsafe state");
            }
        }

        self.current = result.snapshot.clone();
        Ok(result)
    }

    /// Restore the initial configuration and re-check it
    pub fn reset(&mut self) -> SafetyResult {
        info!("Resetting to initial state");
        self.current = self.initial.clone();
        self.granted = 0;
        self.denied = 0;
        self.status()
    }
}

/// `A`..`Z` for the first 26 resource types, then `R26`, `R27`, ...
pub fn default_resource_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match u8::try_from(i) {
            Ok(n) if n < 26 => char::from(b'A' + n).to_string(),
            _ => format!("R{}", i),
        })
        .collect()
}
