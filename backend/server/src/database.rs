//! # Redis
//!
//! Persistence for the guestbook and device status snapshots.
//!
//! ## Requirements
//!
//! - At most one guestbook entry per submitter address and one per fingerprint
//! - The rule must hold even when two submissions race past the service check
//! - Newest-first listing capped at 100 entries
//! - Append-only status history ordered by the device's own timestamp, newest
//!   first, bounded. A late post must not show up as the latest reading
//!
//! ## Implementation
//!
//! - Entry: hash `guestbook:entry:<id>` (id, message, fingerprint, address, created_at)
//! - Unique indexes: `guestbook:address:<address>` and `guestbook:fingerprint:<fingerprint>`, both holding the entry id
//! - Ordering: sorted set `guestbook:entries`, score is creation time in milliseconds
//! - Insert and delete run as Lua scripts so index checks and writes are atomic,
//!   the indexes are the actual source of truth for "already signed"
//! - Status history: sorted set `status:snapshots` of JSON documents, score is the
//!   snapshot timestamp in milliseconds, trimmed to the cap from the oldest end
//!
//! ## Traits
//!
//! Services are generic over [`GuestbookStore`] and [`StatusStore`] so they
//! can be exercised against in-memory stores in tests.
use std::{collections::HashMap, future::Future, time::Duration};

use chrono::{DateTime, Utc};
use payloads::{guestbook::EntryView, status::StoredStatus};
use redis::{
    AsyncCommands, Client, RedisError, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use thiserror::Error;

const ENTRY_PREFIX: &str = "guestbook:entry:";
const ADDRESS_PREFIX: &str = "guestbook:address:";
const FINGERPRINT_PREFIX: &str = "guestbook:fingerprint:";
const ENTRIES_KEY: &str = "guestbook:entries";
const STATUS_KEY: &str = "status:snapshots";

const INSERT_ENTRY: &str = r#"
if redis.call('EXISTS', KEYS[2]) == 1 or redis.call('EXISTS', KEYS[3]) == 1 then
    return 0
end
redis.call('HSET', KEYS[1], 'id', ARGV[1], 'message', ARGV[2], 'fingerprint', ARGV[3], 'address', ARGV[4], 'created_at', ARGV[5])
redis.call('SET', KEYS[2], ARGV[1])
redis.call('SET', KEYS[3], ARGV[1])
redis.call('ZADD', KEYS[4], ARGV[6], ARGV[1])
return 1
"#;

const REMOVE_ENTRY: &str = r#"
if redis.call('DEL', KEYS[1]) == 0 then
    return 0
end
for i = 2, 3 do
    if redis.call('GET', KEYS[i]) == ARGV[1] then
        redis.call('DEL', KEYS[i])
    end
end
redis.call('ZREM', KEYS[4], ARGV[1])
return 1
"#;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub id: String,
    pub message: String,
    pub fingerprint: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl EntryRecord {
    pub fn view(&self) -> EntryView {
        EntryView {
            id: self.id.clone(),
            message: self.message.clone(),
            created_at: self.created_at,
        }
    }

    fn from_fields(mut fields: HashMap<String, String>) -> Option<Self> {
        let created_at = DateTime::parse_from_rfc3339(fields.get("created_at")?)
            .ok()?
            .with_timezone(&Utc);

        Some(Self {
            id: fields.remove("id")?,
            message: fields.remove("message")?,
            fingerprint: fields.remove("fingerprint")?,
            address: fields.remove("address")?,
            created_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Inserted,
    /// Address or fingerprint already owns an entry.
    Duplicate,
}

pub trait GuestbookStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn address_exists(&self, address: &str)
    -> impl Future<Output = Result<bool, Self::Error>> + Send;

    fn fingerprint_exists(
        &self,
        fingerprint: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Must reject duplicates atomically with the write.
    fn insert(&self, entry: &EntryRecord)
    -> impl Future<Output = Result<Insert, Self::Error>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<Option<EntryRecord>, Self::Error>> + Send;

    /// Returns false when the entry was already gone.
    fn remove(&self, entry: &EntryRecord) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Newest first.
    fn recent(&self, limit: usize)
    -> impl Future<Output = Result<Vec<EntryRecord>, Self::Error>> + Send;
}

pub trait StatusStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Keeps the `cap` snapshots with the newest [`StoredStatus::taken_at`].
    fn push(
        &self,
        status: &StoredStatus,
        cap: usize,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Newest [`StoredStatus::taken_at`] first.
    fn latest(&self, limit: usize)
    -> impl Future<Output = Result<Vec<StoredStatus>, Self::Error>> + Send;
}

/// Everything the server persists, one backend for both.
pub trait Store: GuestbookStore + StatusStore + 'static {}

impl<T: GuestbookStore + StatusStore + 'static> Store for T {}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;

    client.get_connection_manager_with_config(config).await
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    insert_entry: Script,
    remove_entry: Script,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self {
            connection,
            insert_entry: Script::new(INSERT_ENTRY),
            remove_entry: Script::new(REMOVE_ENTRY),
        }
    }
}

fn entry_key(id: &str) -> String {
    format!("{ENTRY_PREFIX}{id}")
}

fn address_key(address: &str) -> String {
    format!("{ADDRESS_PREFIX}{address}")
}

fn fingerprint_key(fingerprint: &str) -> String {
    format!("{FINGERPRINT_PREFIX}{fingerprint}")
}

fn status_score(status: &StoredStatus) -> i64 {
    status.taken_at().timestamp_millis()
}

impl GuestbookStore for RedisStore {
    type Error = StoreError;

    async fn address_exists(&self, address: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();

        Ok(connection.exists(address_key(address)).await?)
    }

    async fn fingerprint_exists(&self, fingerprint: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();

        Ok(connection.exists(fingerprint_key(fingerprint)).await?)
    }

    async fn insert(&self, entry: &EntryRecord) -> Result<Insert, StoreError> {
        let mut connection = self.connection.clone();

        let mut invocation = self.insert_entry.prepare_invoke();
        invocation
            .key(entry_key(&entry.id))
            .key(address_key(&entry.address))
            .key(fingerprint_key(&entry.fingerprint))
            .key(ENTRIES_KEY)
            .arg(&entry.id)
            .arg(&entry.message)
            .arg(&entry.fingerprint)
            .arg(&entry.address)
            .arg(entry.created_at.to_rfc3339())
            .arg(entry.created_at.timestamp_millis());

        let inserted: i32 = invocation.invoke_async(&mut connection).await?;

        Ok(if inserted == 1 {
            Insert::Inserted
        } else {
            Insert::Duplicate
        })
    }

    async fn get(&self, id: &str) -> Result<Option<EntryRecord>, StoreError> {
        let mut connection = self.connection.clone();

        let fields: HashMap<String, String> = connection.hgetall(entry_key(id)).await?;

        Ok(EntryRecord::from_fields(fields))
    }

    async fn remove(&self, entry: &EntryRecord) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();

        let mut invocation = self.remove_entry.prepare_invoke();
        invocation
            .key(entry_key(&entry.id))
            .key(address_key(&entry.address))
            .key(fingerprint_key(&entry.fingerprint))
            .key(ENTRIES_KEY)
            .arg(&entry.id);

        let removed: i32 = invocation.invoke_async(&mut connection).await?;

        Ok(removed == 1)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<EntryRecord>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut connection = self.connection.clone();

        let ids: Vec<String> = connection
            .zrevrange(ENTRIES_KEY, 0, limit as isize - 1)
            .await?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for id in &ids {
            pipe.hgetall(entry_key(id));
        }

        let rows: Vec<HashMap<String, String>> = pipe.query_async(&mut connection).await?;

        // Rows deleted between the two round trips come back empty.
        Ok(rows.into_iter().filter_map(EntryRecord::from_fields).collect())
    }
}

impl StatusStore for RedisStore {
    type Error = StoreError;

    async fn push(&self, status: &StoredStatus, cap: usize) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let document = serde_json::to_string(status)?;

        let _: () = redis::pipe()
            .atomic()
            .zadd(STATUS_KEY, document, status_score(status))
            .ignore()
            .zremrangebyrank(STATUS_KEY, 0, -(cap.max(1) as isize) - 1)
            .ignore()
            .query_async(&mut connection)
            .await?;

        Ok(())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<StoredStatus>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut connection = self.connection.clone();

        let documents: Vec<String> = connection
            .zrevrange(STATUS_KEY, 0, limit as isize - 1)
            .await?;

        documents
            .iter()
            .map(|document| serde_json::from_str(document).map_err(StoreError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use payloads::status::StatusSnapshot;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_record_from_fields() {
        let record = EntryRecord::from_fields(fields(&[
            ("id", "e1"),
            ("message", "hi there"),
            ("fingerprint", "-1a2b"),
            ("address", "203.0.113.9"),
            ("created_at", "2025-11-05T10:00:00+00:00"),
        ]))
        .unwrap();

        assert_eq!(record.id, "e1");
        assert_eq!(record.address, "203.0.113.9");
        assert_eq!(record.view().message, "hi there");
    }

    #[test]
    fn test_missing_hash_is_none() {
        assert!(EntryRecord::from_fields(HashMap::new()).is_none());
        assert!(
            EntryRecord::from_fields(fields(&[
                ("id", "e1"),
                ("message", "hi"),
                ("created_at", "not a date"),
            ]))
            .is_none()
        );
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(entry_key("e1"), "guestbook:entry:e1");
        assert_eq!(address_key("::1"), "guestbook:address:::1");
        assert_eq!(fingerprint_key("abc"), "guestbook:fingerprint:abc");
    }

    #[test]
    fn test_status_scored_by_device_time() {
        let received_at = Utc::now();
        let taken_at = DateTime::from_timestamp(1_762_336_800, 0).unwrap();

        let mut status = StoredStatus {
            id: "s1".into(),
            received_at,
            snapshot: StatusSnapshot {
                device_id: Some("mbp".into()),
                timestamp: Some(taken_at),
                ..Default::default()
            },
        };
        assert_eq!(status_score(&status), 1_762_336_800_000);

        status.snapshot.timestamp = None;
        assert_eq!(status_score(&status), received_at.timestamp_millis());
    }

    #[tokio::test]
    async fn test_init_rejects_bad_url() {
        assert!(init_redis("not a redis url").await.is_err());
    }
}
