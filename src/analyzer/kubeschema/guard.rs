//! Reentrancy protection for analysis computations.
//!
//! A [`RecursionGuard`] marks a logical computation (guard id + key) as
//! in progress on the current thread. A reentrant call with the same
//! identity short-circuits to a caller-supplied default instead of
//! recursing. Markers are released by a drop guard, so they are cleared
//! when the computation returns or unwinds.

use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
    static IN_PROGRESS: RefCell<HashSet<(&'static str, String)>> = RefCell::new(HashSet::new());
}

/// Prevents a computation from re-entering itself for the same identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursionGuard {
    id: &'static str,
}

impl RecursionGuard {
    /// Create a guard with a fixed identifier.
    pub const fn new(id: &'static str) -> Self {
        Self { id }
    }

    /// The identifier of this guard.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Run `compute` unless a computation with the same `key` is already
    /// running under this guard on the current thread, in which case
    /// `default` is returned.
    pub fn do_preventing_recursion<T>(
        &self,
        key: &str,
        default: T,
        compute: impl FnOnce() -> T,
    ) -> T {
        let identity = (self.id, key.to_string());
        let entered = IN_PROGRESS
            .try_with(|set| set.borrow_mut().insert(identity.clone()))
            .unwrap_or(false);

        if !entered {
            log::debug!(
                "recursion prevented for guard '{}' with key '{}'",
                self.id,
                key
            );
            return default;
        }

        let _marker = InProgressMarker { identity };
        compute()
    }

    /// Check whether a computation for `key` is currently running on this thread.
    pub fn is_in_progress(&self, key: &str) -> bool {
        IN_PROGRESS
            .try_with(|set| set.borrow().contains(&(self.id, key.to_string())))
            .unwrap_or(false)
    }
}

struct InProgressMarker {
    identity: (&'static str, String),
}

impl Drop for InProgressMarker {
    fn drop(&mut self) {
        // TLS may already be torn down during thread exit.
        let _ = IN_PROGRESS.try_with(|set| set.borrow_mut().remove(&self.identity));
    }
}
