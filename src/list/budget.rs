//! Step accounting shared across nested list searches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Search budget shared by a match and every list match nested inside it.
///
/// Clones share a single counter, so a budget handed down to nested
/// searches bounds the whole search tree rather than each level.
#[derive(Debug, Clone, Default)]
pub struct StepBudget {
    used: Arc<AtomicU64>,
    limit: Option<u64>,
}

impl StepBudget {
    /// Creates a budget of `limit` steps, or an unbounded one for `None`.
    pub fn new(limit: Option<u64>) -> Self {
        Self {
            used: Arc::default(),
            limit,
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Steps charged so far across all sharers.
    pub fn used(&self) -> u64 {
        self.used.load(Ordering::Relaxed)
    }

    pub fn is_exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.used() >= limit)
    }

    /// Charges one step.
    pub fn charge(&self) {
        self.used.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counter() {
        let budget = StepBudget::new(Some(2));
        let nested = budget.clone();
        budget.charge();
        assert!(!nested.is_exhausted());
        nested.charge();
        assert_eq!(budget.used(), 2);
        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_unbounded_never_exhausts() {
        let budget = StepBudget::unbounded();
        for _ in 0..1_000 {
            budget.charge();
        }
        assert_eq!(budget.limit(), None);
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn test_independent_budgets() {
        let a = StepBudget::new(Some(1));
        let b = StepBudget::new(Some(1));
        a.charge();
        assert!(a.is_exhausted());
        assert_eq!(b.used(), 0);
    }
}
