//! Concurrency gate around model calls
//!
//! The worker pool decides how many documents are in flight; the gate
//! decides how many of them may talk to the model at once. The two limits
//! are independent.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting gate limiting simultaneous model calls
///
/// Built once per run and cloned into every job. A limit of 0 disables
/// gating entirely.
#[derive(Debug, Clone)]
pub struct LlmGate {
    semaphore: Option<Arc<Semaphore>>,
    limit: usize,
}

/// Held while a model call is in progress; dropping it frees the slot
#[derive(Debug)]
pub struct GatePermit {
    _permit: Option<OwnedSemaphorePermit>,
}

impl LlmGate {
    /// Create a gate admitting at most `limit` holders (0 = unlimited)
    pub fn new(limit: usize) -> Self {
        let semaphore = (limit > 0).then(|| Arc::new(Semaphore::new(limit)));
        Self { semaphore, limit }
    }

    /// Create a gate that never blocks
    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// Whether the gate limits anything
    pub fn is_enabled(&self) -> bool {
        self.semaphore.is_some()
    }

    /// Configured limit, `None` when gating is disabled
    pub fn limit(&self) -> Option<usize> {
        self.is_enabled().then_some(self.limit)
    }

    /// Free slots right now, `None` when gating is disabled
    pub fn available(&self) -> Option<usize> {
        self.semaphore.as_ref().map(|s| s.available_permits())
    }

    /// Wait for a slot
    pub async fn acquire(&self) -> GatePermit {
        let permit = match &self.semaphore {
            // Never closed, so acquisition cannot fail.
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };
        GatePermit { _permit: permit }
    }
}
