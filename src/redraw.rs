//! Redraw triggers - ask a rendering context to re-evaluate after a state change

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Capability that marks a rendering/evaluation context as needing re-evaluation
pub trait RedrawTrigger: Send + Sync {
    fn mark_for_check(&self);
}

/// Function-based trigger
pub struct FnRedraw<F: Fn() + Send + Sync>(pub F);

impl<F: Fn() + Send + Sync> RedrawTrigger for FnRedraw<F> {
    fn mark_for_check(&self) {
        (self.0)();
    }
}

/// Dirty flag a host checks before rendering.
///
/// Counts every request, even while already dirty.
#[derive(Debug, Default)]
pub struct RedrawFlag {
    dirty: AtomicBool,
    requests: AtomicU64,
}

impl RedrawFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a redraw is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clear the pending flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Total requests received.
    pub fn count(&self) -> u64 {
        self.requests.load(Ordering::Acquire)
    }
}

impl RedrawTrigger for RedrawFlag {
    fn mark_for_check(&self) {
        self.requests.fetch_add(1, Ordering::AcqRel);
        self.dirty.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_take() {
        let flag = RedrawFlag::new();
        assert!(!flag.is_dirty());

        flag.mark_for_check();
        flag.mark_for_check();
        assert!(flag.is_dirty());
        assert_eq!(flag.count(), 2);

        assert!(flag.take());
        assert!(!flag.take());
        assert_eq!(flag.count(), 2);
    }
}
