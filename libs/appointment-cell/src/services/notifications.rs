// libs/appointment-cell/src/services/notifications.rs
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    AppointmentConfirmation,
}

/// Delivery collaborator. Delivery happens asynchronously with respect to
/// the booking call; failures are logged by the engine and never fail a
/// booking.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, kind: NotificationKind, params: Value) -> Result<()>;
}

/// Default notifier for deployments without a delivery channel configured:
/// records the request and succeeds.
#[derive(Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, kind: NotificationKind, params: Value) -> Result<()> {
        info!("Notification {:?} for {}: {}", kind, recipient, params);
        Ok(())
    }
}
