//! Core engine, the fetch → load → evaluate pipeline.
//!
//! `Monitor` owns the quote source, the alert store, and the notifier,
//! and runs one evaluation pass per tick. Scheduling lives in the
//! binary; the engine itself has no notion of intervals.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::notify::Notifier;
use crate::quotes::QuoteSource;
use crate::store::AlertStore;
use crate::types::TickReport;

/// One-pair price monitor evaluating threshold alerts.
pub struct Monitor {
    source: Box<dyn QuoteSource>,
    store: Box<dyn AlertStore>,
    notifier: Box<dyn Notifier>,
}

impl Monitor {
    pub fn new(
        source: Box<dyn QuoteSource>,
        store: Box<dyn AlertStore>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
        }
    }

    /// Run a single fetch → load → evaluate tick.
    ///
    /// Quote and store failures abort the tick and propagate to the
    /// scheduler. Notification failures are contained here: the status
    /// update is already durable by the time delivery runs.
    pub async fn run_tick(&self) -> Result<TickReport> {
        let quote = self.source.fetch().await?;

        let alerts = self.store.load_active().await?;
        if alerts.is_empty() {
            info!("No active alerts to evaluate");
        }

        let alerts_checked = alerts.len();
        let mut alerts_fired = 0;
        let mut stale_updates = 0;

        for alert in alerts {
            if !alert.matches(&quote) {
                continue;
            }

            let price = alert.trigger_price(&quote);
            info!(
                alert = %alert.name,
                kind = %alert.kind,
                threshold = alert.price,
                price,
                "Alert threshold crossed"
            );

            // Status-guarded update: matches nothing if the alert fired
            // or was removed since it was loaded.
            if !self.store.mark_fired(alert.id).await? {
                warn!(alert_id = %alert.id, "Failed to update alert, no ACTIVE document matched");
                stale_updates += 1;
                continue;
            }

            info!(alert_id = %alert.id, "Updated alert to FIRED");
            alerts_fired += 1;

            if let Err(e) = self.notifier.alert_fired(&alert, price).await {
                warn!(alert = %alert.name, error = %e, "Notification delivery failed");
            }
        }

        Ok(TickReport {
            buy_price: quote.buy,
            sell_price: quote.sell,
            alerts_checked,
            alerts_fired,
            stale_updates,
            at: Utc::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
