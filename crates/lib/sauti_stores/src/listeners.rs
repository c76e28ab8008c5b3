//! Explicit change notification.
//!
//! Stores call [`Listeners::notify`] after every state transition instead
//! of relying on implicit dependency tracking. Consumers subscribe a
//! callback and re-read the store's snapshot accessors when it fires.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
pub type ListenerId = u64;

/// Ordered registry of change listeners.
#[derive(Default)]
pub struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Arc<dyn Fn() + Send + Sync>)>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it fires after every subsequent state
    /// transition until unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Invoke every listener in subscription order.
    ///
    /// Listeners run outside the registry lock, so a listener may
    /// subscribe or unsubscribe re-entrantly.
    pub fn notify(&self) {
        let snapshot: Vec<Arc<dyn Fn() + Send + Sync>> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener();
        }
    }
}
