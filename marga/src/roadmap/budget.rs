//! Time and cancellation budget for a generation pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Caller-supplied limit on how long generation may run.
///
/// Every stage polls [`GenerationBudget::is_exhausted`] between units of
/// work. An unlimited budget never fires.
#[derive(Clone, Debug, Default)]
pub struct GenerationBudget {
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl GenerationBudget {
    /// Budget with no deadline and no cancellation flag.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Stop at the given instant.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop after `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Stop once `flag` is set to `true` from any thread.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Has the deadline passed or cancellation been requested?
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        if let Some(flag) = &self.cancel
            && flag.load(Ordering::Relaxed)
        {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_fires() {
        assert!(!GenerationBudget::unlimited().is_exhausted());
    }

    #[test]
    fn test_past_deadline_fires() {
        let budget = GenerationBudget::unlimited().with_deadline(Instant::now());
        assert!(budget.is_exhausted());

        let budget = GenerationBudget::unlimited().with_timeout(Duration::from_secs(3600));
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn test_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let budget = GenerationBudget::unlimited().with_cancel_flag(flag.clone());
        assert!(!budget.is_exhausted());
        flag.store(true, Ordering::Relaxed);
        assert!(budget.is_exhausted());
    }
}
