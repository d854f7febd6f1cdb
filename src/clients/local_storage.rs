use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_duckdb::ClientBuilder;
use async_duckdb::duckdb::OptionalExt;
use async_trait::async_trait;
use log::debug;

use crate::clients::errors::Result;

const TABLE: &str = "key_value";

/// Persistent string key-value storage, the shape of a browser's `localStorage`.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Value under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
    /// Stores `value` under `key`, replacing what was there.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Deletes `key`; missing keys are fine.
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// `DuckDB` backed storage that survives restarts.
pub struct LocalStorage {
    client: async_duckdb::Client,
}

impl LocalStorage {
    /// Wraps an already opened client. Call [`LocalStorage::init_db`] before use.
    pub fn new(client: async_duckdb::Client) -> Self {
        LocalStorage { client }
    }

    /// Opens (or creates) the database file at `path` and makes sure the table exists.
    pub async fn open(path: &Path) -> Result<Self> {
        let client = ClientBuilder::new().path(path).open().await?;
        debug!("Opened local storage database at {path:?}");
        let storage = LocalStorage::new(client);
        storage.init_db().await?;
        Ok(storage)
    }

    /// Creates the key-value table if it is missing.
    pub async fn init_db(&self) -> Result<()> {
        let table_query = format!(
            "CREATE TABLE IF NOT EXISTS {TABLE} (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );"
        );
        self.client
            .conn(move |conn| conn.execute_batch(&table_query))
            .await?;

        debug!("Successfully initialized local storage database");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for LocalStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let query = format!("SELECT value FROM {TABLE} WHERE key = ?1 LIMIT 1;");
        let key_owned = key.to_string();

        let value = self
            .client
            .conn(move |conn| {
                conn.query_row(&query, [key_owned], |row| row.get::<_, String>(0))
                    .optional()
            })
            .await?;
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let query = format!("INSERT OR REPLACE INTO {TABLE} (key, value) VALUES (?1, ?2);");
        let key_owned = key.to_string();
        let value_owned = value.to_string();

        self.client
            .conn(move |conn| conn.execute(&query, [key_owned, value_owned]))
            .await?;

        debug!("Stored `{key}` in local storage");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let query = format!("DELETE FROM {TABLE} WHERE key = ?1;");
        let key_owned = key.to_string();

        self.client
            .conn(move |conn| conn.execute(&query, [key_owned]))
            .await?;

        debug!("Removed `{key}` from local storage");
        Ok(())
    }
}

/// In-process storage, lost on drop.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage holding a single entry.
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.lock().insert(key.to_string(), value.to_string());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}
