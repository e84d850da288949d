//! Observer registry.
//!
//! Holds non-owning references to observers. Sessions own their observer;
//! once the owner drops it the entry is skipped and pruned lazily.

use super::observer::Observer;
use std::sync::{Arc, Weak};

#[derive(Default)]
pub struct ObserverRegistry {
    entries: Vec<Weak<dyn Observer>>,
}

impl ObserverRegistry {
    /// Append an entry. The same observer may be registered more than once.
    pub fn register(&mut self, observer: &Arc<dyn Observer>) {
        self.prune();
        self.entries.push(Arc::downgrade(observer));
    }

    /// Remove the first entry pointing at `observer`.
    ///
    /// Returns `false` if no entry matched.
    pub fn unregister(&mut self, observer: &Arc<dyn Observer>) -> bool {
        self.prune();
        let target = Arc::downgrade(observer);
        match self.entries.iter().position(|entry| entry.ptr_eq(&target)) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Live observers in registration order, one item per entry.
    ///
    /// Entries whose observer has been dropped are pruned on the way.
    pub fn live(&mut self) -> Vec<Arc<dyn Observer>> {
        self.prune();
        self.entries.iter().filter_map(Weak::upgrade).collect()
    }

    /// Number of entries, including ones whose observer has been dropped.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn live_len(&self) -> usize {
        self.entries.iter().filter(|e| e.strong_count() > 0).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries whose observer no longer exists. Returns how many were removed.
    fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.strong_count() > 0);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::trace!(removed, "Pruned dropped observers");
        }
        removed
    }
}
