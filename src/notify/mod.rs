//! Notification delivery for fired alerts.
//!
//! Defines the `Notifier` trait and two implementations: a structured
//! log notifier (the default) and a webhook notifier. Delivery runs
//! after the status update has been persisted, and a delivery failure
//! never fails the tick.

pub mod webhook;

use async_trait::async_trait;
use tracing::warn;

use crate::types::Alert;

pub use webhook::WebhookNotifier;

/// Errors raised by notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Sink for fired-alert notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification for an alert that just fired at `price`.
    async fn alert_fired(&self, alert: &Alert, price: f64) -> Result<(), NotifierError>;
}

/// Notifier that only emits a structured log line.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn alert_fired(&self, alert: &Alert, price: f64) -> Result<(), NotifierError> {
        warn!(
            alert_id = %alert.id,
            alert_name = %alert.name,
            kind = %alert.kind,
            threshold = alert.price,
            price,
            "ALERT FIRED"
        );
        Ok(())
    }
}
