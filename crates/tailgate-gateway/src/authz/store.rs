//! Policy hand-off between the reload path and request handlers.

use std::sync::{Arc, PoisonError, RwLock};

use tailgate_core::Policy;

/// Holds the currently published policy.
///
/// Readers take a clone of the `Arc` and evaluate against it without holding
/// the lock; `publish` swaps in a fully built replacement. A request that
/// loaded the old policy finishes against it.
#[derive(Debug)]
pub struct PolicyStore {
    current: RwLock<Arc<Policy>>,
}

impl PolicyStore {
    pub fn new(policy: Policy) -> Self {
        Self {
            current: RwLock::new(Arc::new(policy)),
        }
    }

    pub fn load(&self) -> Arc<Policy> {
        // The guarded value is a single Arc, so a poisoned lock still holds a
        // complete policy.
        let g = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&g)
    }

    /// Publish `policy`, returning the one it replaced.
    pub fn publish(&self, policy: Policy) -> Arc<Policy> {
        let next = Arc::new(policy);
        let mut g = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *g, next)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tailgate_core::{decide, parse_policy, Verdict};

    #[test]
    fn in_flight_reader_keeps_old_policy() {
        let store = PolicyStore::new(parse_policy("user bob r1").unwrap());
        let before = store.load();

        let old = store.publish(parse_policy("user bob r2").unwrap());
        assert!(Arc::ptr_eq(&before, &old));

        assert_eq!(decide(&before, "bob", "r1"), Verdict::Allow);
        assert_eq!(decide(&store.load(), "bob", "r1"), Verdict::Forbidden);
        assert_eq!(decide(&store.load(), "bob", "r2"), Verdict::Allow);
    }
}
