//! Typed session access.
//!
//! The session is three string blobs: the verified phone number, the profile
//! JSON and the repair history JSON array. [`SessionStore`] implementors only
//! provide raw key access; the typed accessors are shared.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rescue_core::{RepairRecord, UserProfile};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::{entry, Database};

/// Key holding the verified phone number.
pub const PHONE_KEY: &str = "eb_rescue_user_phone";

/// Key holding the profile JSON object.
pub const PROFILE_KEY: &str = "eb_rescue_user_profile";

/// Key holding the repair history JSON array.
pub const HISTORY_KEY: &str = "eb_rescue_repair_history";

/// Persisted session state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a raw value.
    async fn get_raw(&self, key: &'static str) -> Result<Option<String>>;

    /// Write a raw value, replacing any previous one.
    async fn set_raw(&self, key: &'static str, value: &str) -> Result<()>;

    /// Remove a value.
    async fn remove(&self, key: &'static str) -> Result<()>;

    async fn phone(&self) -> Result<Option<String>> {
        Ok(self
            .get_raw(PHONE_KEY)
            .await?
            .filter(|phone| !phone.trim().is_empty()))
    }

    async fn set_phone(&self, phone: &str) -> Result<()> {
        self.set_raw(PHONE_KEY, phone).await
    }

    /// Stored profile. A blob that no longer parses is treated as absent.
    async fn profile(&self) -> Result<Option<UserProfile>> {
        read_json(self, PROFILE_KEY).await
    }

    async fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        write_json(self, PROFILE_KEY, profile).await
    }

    /// Stored history, newest first. Missing or unreadable history is empty.
    async fn history(&self) -> Result<Vec<RepairRecord>> {
        Ok(read_json(self, HISTORY_KEY).await?.unwrap_or_default())
    }

    async fn set_history(&self, history: &[RepairRecord]) -> Result<()> {
        write_json(self, HISTORY_KEY, history).await
    }

    /// Forget the phone number and profile.
    async fn clear_user(&self) -> Result<()> {
        self.remove(PHONE_KEY).await?;
        self.remove(PROFILE_KEY).await
    }

    /// Forget everything, history included.
    async fn clear_all(&self) -> Result<()> {
        self.clear_user().await?;
        self.remove(HISTORY_KEY).await
    }
}

async fn read_json<S, T>(store: &S, key: &'static str) -> Result<Option<T>>
where
    S: SessionStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get_raw(key).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring unreadable session value {}: {}", key, e);
            Ok(None)
        }
    }
}

async fn write_json<S, T>(store: &S, key: &'static str, value: &T) -> Result<()>
where
    S: SessionStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Json { key, source })?;
    debug!("Persisting {} ({} bytes)", key, raw.len());
    store.set_raw(key, &raw).await
}

/// Session store backed by the `session_entries` SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    db: Database,
}

impl SqliteSessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Connect, run migrations and wrap the database.
    pub async fn open(url: &str) -> Result<Self> {
        let db = Database::connect(url).await?;
        db.migrate().await?;
        Ok(Self::new(db))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get_raw(&self, key: &'static str) -> Result<Option<String>> {
        Ok(entry::get_entry(self.db.pool(), key)
            .await?
            .map(|entry| entry.value))
    }

    async fn set_raw(&self, key: &'static str, value: &str) -> Result<()> {
        entry::upsert_entry(self.db.pool(), key, value).await
    }

    async fn remove(&self, key: &'static str) -> Result<()> {
        entry::delete_entry(self.db.pool(), key).await
    }

    async fn clear_all(&self) -> Result<()> {
        entry::clear_all(self.db.pool()).await
    }
}

/// Process-local session store, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<&'static str, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_raw(&self, key: &'static str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set_raw(&self, key: &'static str, value: &str) -> Result<()> {
        self.entries().insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &'static str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
