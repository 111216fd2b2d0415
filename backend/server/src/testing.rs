//! In-memory stand-in for [`RedisStore`](crate::database::RedisStore).
use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use payloads::status::StoredStatus;
use thiserror::Error;

use crate::database::{EntryRecord, GuestbookStore, Insert, StatusStore};

#[derive(Error, Debug)]
#[error("store offline")]
pub struct Offline;

/// Unique indexes enforced under one lock, like the Lua scripts.
#[derive(Default)]
pub struct MemoryStore {
    pub entries: Mutex<Vec<EntryRecord>>,
    pub history: Mutex<Vec<StoredStatus>>,
    pub offline: AtomicBool,
    /// Lookups report nothing, as if a racing submission had not committed yet.
    pub blind: AtomicBool,
    pub recent_calls: AtomicUsize,
}

impl MemoryStore {
    fn online(&self) -> Result<(), Offline> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Offline)
        } else {
            Ok(())
        }
    }

    fn sighted(&self) -> bool {
        !self.blind.load(Ordering::SeqCst)
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl GuestbookStore for MemoryStore {
    type Error = Offline;

    async fn address_exists(&self, address: &str) -> Result<bool, Offline> {
        self.online()?;
        Ok(self.sighted()
            && self
                .entries
                .lock()
                .unwrap()
                .iter()
                .any(|e| e.address == address))
    }

    async fn fingerprint_exists(&self, fingerprint: &str) -> Result<bool, Offline> {
        self.online()?;
        Ok(self.sighted()
            && self
                .entries
                .lock()
                .unwrap()
                .iter()
                .any(|e| e.fingerprint == fingerprint))
    }

    async fn insert(&self, entry: &EntryRecord) -> Result<Insert, Offline> {
        self.online()?;
        let mut entries = self.entries.lock().unwrap();
        if entries
            .iter()
            .any(|e| e.address == entry.address || e.fingerprint == entry.fingerprint)
        {
            return Ok(Insert::Duplicate);
        }
        entries.push(entry.clone());
        Ok(Insert::Inserted)
    }

    async fn get(&self, id: &str) -> Result<Option<EntryRecord>, Offline> {
        self.online()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn remove(&self, entry: &EntryRecord) -> Result<bool, Offline> {
        self.online()?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != entry.id);
        Ok(entries.len() != before)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<EntryRecord>, Offline> {
        self.online()?;
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock().unwrap().clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        Ok(entries)
    }
}

impl StatusStore for MemoryStore {
    type Error = Offline;

    async fn push(&self, status: &StoredStatus, cap: usize) -> Result<(), Offline> {
        self.online()?;
        let mut history = self.history.lock().unwrap();
        history.push(status.clone());
        history.sort_by(|a, b| b.taken_at().cmp(&a.taken_at()));
        history.truncate(cap.max(1));
        Ok(())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<StoredStatus>, Offline> {
        self.online()?;
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }
}
