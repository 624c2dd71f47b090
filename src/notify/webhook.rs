//! Webhook notification delivery.
//!
//! POSTs a JSON payload describing the fired alert to a configured URL.
//! Payload shape:
//! `{"alert_id", "alert_name", "kind", "threshold", "price", "fired_at"}`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::debug;

use super::{Notifier, NotifierError};
use crate::types::Alert;

/// Notifier that delivers fired alerts to an HTTP webhook.
pub struct WebhookNotifier {
    http: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("vigil/0.1.0")
            .build()
            .context("Failed to build HTTP client for webhook notifier")?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    fn payload(alert: &Alert, price: f64) -> serde_json::Value {
        serde_json::json!({
            "alert_id": alert.id.to_hex(),
            "alert_name": alert.name,
            "kind": alert.kind,
            "threshold": alert.price,
            "price": price,
            "fired_at": Utc::now().timestamp(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn alert_fired(&self, alert: &Alert, price: f64) -> Result<(), NotifierError> {
        debug!(url = %self.url, alert_id = %alert.id, "Delivering webhook notification");

        let resp = self
            .http
            .post(&self.url)
            .json(&Self::payload(alert, price))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(NotifierError::Status(resp.status()));
        }

        Ok(())
    }
}
