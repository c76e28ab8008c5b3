//! Local notification scheduling seam.
//!
//! The OS notification backend lives in the host shell; the store layer
//! only needs "ask for permission" and "deliver now".

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification permission denied")]
    PermissionDenied,

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

/// Capability to request permission and schedule immediate notifications.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Ask the OS for notification permission. Returns whether it is
    /// granted (either already, or as a result of this call).
    async fn request_permission(&self) -> Result<bool, NotifyError>;

    /// Deliver a notification immediately, returning the scheduled id.
    async fn schedule(&self, title: &str, body: &str) -> Result<String, NotifyError>;
}

/// Scheduler that logs deliveries instead of touching the OS.
///
/// Used by headless hosts and tests; permission is always granted.
#[derive(Debug, Default)]
pub struct TracingScheduler;

impl TracingScheduler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationScheduler for TracingScheduler {
    async fn request_permission(&self) -> Result<bool, NotifyError> {
        Ok(true)
    }

    async fn schedule(&self, title: &str, body: &str) -> Result<String, NotifyError> {
        let id = uuid::Uuid::new_v4().to_string();
        info!(id, title, body, "notification delivered");
        Ok(id)
    }
}
