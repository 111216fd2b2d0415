//! # Device Status
//!
//! Ingestion and read-back of telemetry snapshots posted by the reporter
//! agent. Snapshots are append-only and ordered by the device's timestamp,
//! not by arrival. Reads degrade to an empty history.
use chrono::Utc;
use payloads::status::{Health, StatusReceipt, StatusSnapshot, StoredStatus};
use tracing::{error, info};
use uuid::Uuid;

use crate::{database::StatusStore, error::AppError};

pub const HISTORY_LIMIT: usize = 100;
pub const SERVICE_NAME: &str = "MacStatus API";

pub struct DeviceStatus<S> {
    store: S,
    cap: usize,
}

impl<S: StatusStore> DeviceStatus<S> {
    pub fn new(store: S, cap: usize) -> Self {
        Self { store, cap }
    }

    pub async fn ingest(&self, snapshot: StatusSnapshot) -> Result<StatusReceipt, AppError> {
        if !snapshot.has_required_fields() {
            return Err(AppError::Validation(
                "Missing required fields: deviceId, timestamp",
            ));
        }

        let stored = StoredStatus {
            id: Uuid::new_v4().to_string(),
            received_at: Utc::now(),
            snapshot,
        };

        self.store
            .push(&stored, self.cap)
            .await
            .map_err(AppError::internal)?;

        info!(
            "Status {} saved for device {}",
            stored.id,
            stored.snapshot.device_id.as_deref().unwrap_or_default()
        );

        Ok(StatusReceipt {
            success: true,
            message: "Status received".to_string(),
            received_at: stored.received_at,
            id: stored.id,
        })
    }

    /// Newest reading first. `limit` defaults to and is clamped at [`HISTORY_LIMIT`].
    pub async fn latest(&self, limit: Option<usize>) -> Vec<StoredStatus> {
        let limit = limit.unwrap_or(HISTORY_LIMIT).clamp(1, HISTORY_LIMIT);

        self.store.latest(limit).await.unwrap_or_else(|e| {
            error!("Error fetching status history: {e}");
            Vec::new()
        })
    }

    pub fn health(&self) -> Health {
        Health {
            status: "ok".to_string(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}
