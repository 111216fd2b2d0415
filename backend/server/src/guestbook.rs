//! # Guestbook
//!
//! One short message per visitor.
//!
//! ## Eligibility
//! - A visitor is identified by the request address and a client-derived fingerprint
//! - Either one already owning an entry blocks a new one, first writer wins
//! - Lookup failures fail open: a flaky store should not lock real visitors out
//!
//! ## Writes
//! - The eligibility check runs again right before the insert
//! - The check is only a fast path. Two submissions can both pass it, the
//!   store's unique indexes decide which one lands
//! - Deleting requires the fingerprint the entry was created with
//!
//! ## Listing
//! Newest first, at most [`LIST_LIMIT`] rows, cached in process until the next
//! successful create or delete.
use std::sync::Arc;

use chrono::Utc;
use payloads::guestbook::{Eligibility, EntryView};
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    database::{EntryRecord, GuestbookStore, Insert},
    error::AppError,
    utils::{validate_fingerprint, validate_message},
};

pub const LIST_LIMIT: usize = 100;
pub const ALREADY_SIGNED: &str = "You've already signed the guestbook";

#[derive(Default)]
struct Cache {
    generation: u64,
    entries: Option<Arc<Vec<EntryView>>>,
}

pub struct Guestbook<S> {
    store: S,
    cache: RwLock<Cache>,
}

impl<S: GuestbookStore> Guestbook<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: RwLock::new(Cache::default()),
        }
    }

    pub async fn check_eligibility(&self, fingerprint: &str, address: &str) -> Eligibility {
        match self.already_signed(fingerprint, address).await {
            Ok(false) => Eligibility::allowed(),
            Ok(true) => Eligibility::denied(ALREADY_SIGNED),
            Err(e) => {
                warn!("Eligibility lookup failed, allowing {address}: {e}");
                Eligibility::allowed()
            }
        }
    }

    async fn already_signed(&self, fingerprint: &str, address: &str) -> Result<bool, S::Error> {
        if self.store.address_exists(address).await? {
            return Ok(true);
        }

        self.store.fingerprint_exists(fingerprint).await
    }

    /// Returns the new entry id.
    pub async fn submit_entry(
        &self,
        message: &str,
        fingerprint: &str,
        address: &str,
    ) -> Result<String, AppError> {
        let message = validate_message(message)?;
        validate_fingerprint(fingerprint)?;

        let eligibility = self.check_eligibility(fingerprint, address).await;
        if !eligibility.can_sign {
            return Err(AppError::EligibilityDenied(
                eligibility.error.unwrap_or_else(|| ALREADY_SIGNED.to_string()),
            ));
        }

        let record = EntryRecord {
            id: Uuid::new_v4().to_string(),
            message,
            fingerprint: fingerprint.to_string(),
            address: address.to_string(),
            created_at: Utc::now(),
        };

        match self.store.insert(&record).await.map_err(AppError::internal)? {
            Insert::Inserted => {}
            Insert::Duplicate => {
                info!("Duplicate guestbook entry from {address} rejected by store");
                return Err(AppError::EligibilityDenied(ALREADY_SIGNED.to_string()));
            }
        }

        self.invalidate().await;
        info!("Guestbook entry {} created", record.id);

        Ok(record.id)
    }

    pub async fn delete_entry(&self, id: &str, fingerprint: &str) -> Result<(), AppError> {
        let entry = self
            .store
            .get(id)
            .await
            .map_err(AppError::internal)?
            .ok_or(AppError::NotFound)?;

        if entry.fingerprint != fingerprint {
            return Err(AppError::NotAuthorized);
        }

        if !self.store.remove(&entry).await.map_err(AppError::internal)? {
            return Err(AppError::NotFound);
        }

        self.invalidate().await;
        info!("Guestbook entry {id} deleted");

        Ok(())
    }

    /// Read failures degrade to an empty listing.
    pub async fn list_entries(&self) -> Arc<Vec<EntryView>> {
        let generation = {
            let cache = self.cache.read().await;
            if let Some(entries) = &cache.entries {
                return entries.clone();
            }
            cache.generation
        };

        let entries = match self.store.recent(LIST_LIMIT).await {
            Ok(records) => Arc::new(records.iter().map(EntryRecord::view).collect::<Vec<_>>()),
            Err(e) => {
                error!("Error fetching guestbook entries: {e}");
                return Arc::new(Vec::new());
            }
        };

        let mut cache = self.cache.write().await;
        // A write landed while we were reading, our rows may be stale.
        if cache.generation == generation {
            cache.entries = Some(entries.clone());
        }

        entries
    }

    async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        cache.generation += 1;
        cache.entries = None;
    }
}
