//! Alert persistence.
//!
//! Defines the `AlertStore` trait and provides the MongoDB
//! implementation used in production. The store never creates or
//! deletes alerts; external tooling owns those operations.

pub mod mongo;

use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::types::Alert;

pub use mongo::MongoAlertStore;

/// Abstraction over the alert collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Load all alerts with ACTIVE status. An empty result is normal.
    async fn load_active(&self) -> Result<Vec<Alert>>;

    /// Transition one alert from ACTIVE to FIRED.
    ///
    /// Returns `false` when no ACTIVE document matched the id, i.e. the
    /// alert already fired or was removed since it was loaded. Callers
    /// treat that as a warning, not an error.
    async fn mark_fired(&self, id: ObjectId) -> Result<bool>;
}
