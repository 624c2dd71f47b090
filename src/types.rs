//! Shared types for the VIGIL daemon.
//!
//! These types form the data model used across all modules.
//! They mirror the alert documents as they live in MongoDB, so the
//! serde representations are load-bearing: the string values must
//! match what external tooling writes into the collection.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// A persisted threshold rule comparing a live price to a trigger value.
///
/// Created and managed by external tooling; this daemon only reads
/// ACTIVE alerts and flips them to FIRED.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    /// Threshold direction. Stored under the `type` field.
    #[serde(rename = "type")]
    pub kind: AlertKind,

    /// Threshold price in the quote currency.
    pub price: f64,

    pub status: AlertStatus,

    /// Epoch seconds of the ACTIVE→FIRED transition. Absent on documents
    /// that have never fired (and on those created by older tooling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fired_at: Option<i64>,
}

impl Alert {
    /// Whether this alert's threshold is crossed by the given quote.
    ///
    /// MAX alerts compare against the sell price, MIN alerts against the
    /// buy price. Comparisons are strict: a price exactly at the
    /// threshold does not fire.
    pub fn matches(&self, quote: &PriceQuote) -> bool {
        match self.kind {
            AlertKind::Max => quote.sell > self.price,
            AlertKind::Min => quote.buy < self.price,
        }
    }

    /// The price side that drives this alert's comparison.
    pub fn trigger_price(&self, quote: &PriceQuote) -> f64 {
        match self.kind {
            AlertKind::Max => quote.sell,
            AlertKind::Min => quote.buy,
        }
    }

    /// Helper to build a test alert with sensible defaults.
    #[cfg(test)]
    pub fn sample(kind: AlertKind, price: f64) -> Self {
        Alert {
            id: ObjectId::new(),
            name: format!("{kind} @ {price}"),
            kind,
            price,
            status: AlertStatus::Active,
            fired_at: None,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} {} @ {:.2}] ({})",
            self.name, self.id, self.kind, self.price, self.status,
        )
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Threshold direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertKind {
    /// Fires when the sell price exceeds the threshold.
    Max,
    /// Fires when the buy price drops below the threshold.
    Min,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Max => write!(f, "MAX"),
            AlertKind::Min => write!(f, "MIN"),
        }
    }
}

/// Alert lifecycle state. One-directional: ACTIVE → FIRED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    Active,
    Fired,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Active => write!(f, "ACTIVE"),
            AlertStatus::Fired => write!(f, "FIRED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

/// A buy/sell price pair for one currency pair at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Currency pair in Coinbase notation, e.g. "BTC-USD".
    pub pair: String,
    pub buy: f64,
    pub sell: f64,
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} buy={:.2} sell={:.2}", self.pair, self.buy, self.sell)
    }
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// Summary of one fetch→load→evaluate tick, logged by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub buy_price: f64,
    pub sell_price: f64,
    /// Number of ACTIVE alerts loaded and evaluated.
    pub alerts_checked: usize,
    /// Number of alerts transitioned to FIRED this tick.
    pub alerts_fired: usize,
    /// Threshold crossings whose status update matched no document
    /// (already fired or removed underneath us).
    pub stale_updates: usize,
    pub at: DateTime<Utc>,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buy={:.2} sell={:.2} checked={} fired={} stale={}",
            self.buy_price,
            self.sell_price,
            self.alerts_checked,
            self.alerts_fired,
            self.stale_updates,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
