//! Cooperative cancellation
//!
//! The executor polls the flag before every page request. Clones share the
//! same state, so a caller can keep one handle and pass another to the
//! executor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancel signal with an optional deadline
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationFlag {
    /// Creates a flag that is only set by [`cancel`](Self::cancel)
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a flag that also trips once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = CancellationFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());

        handle.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_elapsed_deadline_cancels() {
        let flag = CancellationFlag::with_timeout(Duration::ZERO);
        assert!(flag.is_cancelled());

        let flag = CancellationFlag::with_timeout(Duration::from_secs(3600));
        assert!(!flag.is_cancelled());
    }
}
