//! MongoDB-backed alert store.
//!
//! One collection of alert documents; see `types::Alert` for the
//! document shape. Status values are stored as the uppercase strings
//! "ACTIVE" / "FIRED".

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, info};

use super::AlertStore;
use crate::types::Alert;

/// Alert store backed by a MongoDB collection.
pub struct MongoAlertStore {
    alerts: Collection<Alert>,
}

impl MongoAlertStore {
    /// Connect to MongoDB and bind to the alert collection.
    ///
    /// Pings the server once so a bad URI fails at startup rather than
    /// on the first tick. Retryable writes are enabled so a transient
    /// primary failover does not drop a status update.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .context("Invalid MongoDB connection string")?;
        options.retry_writes = Some(true);

        let client = Client::with_options(options).context("Failed to build MongoDB client")?;

        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .context("MongoDB ping failed")?;

        info!(database, collection, "Connected to MongoDB");

        Ok(Self {
            alerts: db.collection::<Alert>(collection),
        })
    }
}

#[async_trait]
impl AlertStore for MongoAlertStore {
    async fn load_active(&self) -> Result<Vec<Alert>> {
        let mut cursor = self
            .alerts
            .find(doc! { "status": "ACTIVE" }, None)
            .await
            .context("Alert query failed")?;

        let mut alerts = Vec::new();
        while let Some(item) = cursor.next().await {
            alerts.push(item.context("Failed to decode alert document")?);
        }

        debug!(count = alerts.len(), "Loaded active alerts");
        Ok(alerts)
    }

    async fn mark_fired(&self, id: ObjectId) -> Result<bool> {
        // The status guard in the filter makes the transition
        // one-directional and idempotent: a document that already
        // fired matches nothing.
        let result = self
            .alerts
            .update_one(
                doc! { "_id": id, "status": "ACTIVE" },
                doc! { "$set": { "status": "FIRED", "fired_at": Utc::now().timestamp() } },
                None,
            )
            .await
            .context("Alert status update failed")?;

        Ok(result.matched_count > 0)
    }
}
