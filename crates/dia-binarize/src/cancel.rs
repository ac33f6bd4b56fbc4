//! Cooperative cancellation for long-running binarization

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag used to cancel an in-flight binarization
///
/// Clones share the same flag. Workers poll it between rows, so
/// cancellation takes effect within one row of work per worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
