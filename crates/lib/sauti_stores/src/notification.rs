//! Notification store — immediate local notifications plus an in-memory log.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use sauti_core::notify::NotificationScheduler;

use crate::error::StoreError;
use crate::listeners::{ListenerId, Listeners};

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: String,
    pub title: String,
    pub body: String,
}

struct NotificationState {
    log: Vec<NotificationRecord>,
    permission_granted: bool,
}

/// Thin wrapper over the platform notification scheduler.
pub struct NotificationStore {
    scheduler: Arc<dyn NotificationScheduler>,
    state: Mutex<NotificationState>,
    listeners: Listeners,
}

impl NotificationStore {
    pub fn new(scheduler: Arc<dyn NotificationScheduler>) -> Self {
        Self {
            scheduler,
            state: Mutex::new(NotificationState {
                log: Vec::new(),
                permission_granted: false,
            }),
            listeners: Listeners::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NotificationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.lock().log.clone()
    }

    pub fn permission_granted(&self) -> bool {
        self.lock().permission_granted
    }

    pub fn subscribe<F: Fn() + Send + Sync + 'static>(&self, listener: F) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Request notification permission once, at startup.
    pub async fn init(&self) {
        match self.scheduler.request_permission().await {
            Ok(granted) => {
                self.lock().permission_granted = granted;
                self.listeners.notify();
            }
            Err(e) => warn!(error = %e, "notification permission request failed"),
        }
    }

    /// Deliver a notification immediately and append it to the log.
    pub async fn send(&self, title: &str, body: &str) -> Result<String, StoreError> {
        let id = self.scheduler.schedule(title, body).await?;
        self.lock().log.push(NotificationRecord {
            id: id.clone(),
            title: title.to_string(),
            body: body.to_string(),
        });
        self.listeners.notify();
        Ok(id)
    }
}
