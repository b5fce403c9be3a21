//! Caller-initiated cancellation of a running agent.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable cancellation signal.
///
/// The orchestrator checks the flag at the top of every thinking pass;
/// once set, the run stops immediately with a `Cancelled` failure. Setting
/// the flag is idempotent and cannot be undone for the run in progress.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
