//! SQLite view-state backend with in-memory cache.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite;
use async_trait::async_trait;
use dashmap::DashMap;
use datagrid::PersistError;
use datagrid::persist::StoreBackend;

use crate::error::SettingsError;

/// SQLite-backed key-value storage with DashMap read cache.
///
/// # Example
///
/// ```ignore
/// use datagrid::persist::ViewStateStore;
/// use prospect_lib::SqliteBackend;
///
/// let store = ViewStateStore::new(SqliteBackend::open("settings.db").await?);
/// ```
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Open (or create) the database at `path`, in WAL mode.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;
        Self::init(client).await
    }

    /// Open an in-memory database. Data is lost when the backend is
    /// dropped.
    pub async fn open_in_memory() -> Result<Self, SettingsError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;
        Self::init(client).await
    }

    async fn init(client: Client) -> Result<Self, SettingsError> {
        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS view_state (
                        key TEXT PRIMARY KEY,
                        value BLOB NOT NULL,
                        updated_at INTEGER NOT NULL
                    )",
                    [],
                )
            })
            .await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl StoreBackend for SqliteBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let key_owned = key.to_string();
        let result = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM view_state WHERE key = ?")?;
                let mut rows = stmt.query([&key_owned])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, Vec<u8>>(0)?)),
                    None => Ok(None),
                }
            })
            .await
            .map_err(SettingsError::from)?;

        if let Some(ref value) = result {
            self.cache.insert(key.to_string(), value.clone());
        }

        Ok(result)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), PersistError> {
        let key_owned = key.to_string();
        let value_clone = value.clone();
        let now = chrono::Utc::now().timestamp();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO view_state (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                    updated_at = excluded.updated_at",
                    rusqlite::params![&key_owned, &value_clone, now],
                )
            })
            .await
            .map_err(SettingsError::from)?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), PersistError> {
        let key_owned = key.to_string();

        self.client
            .conn(move |conn| conn.execute("DELETE FROM view_state WHERE key = ?", [&key_owned]))
            .await
            .map_err(SettingsError::from)?;

        self.cache.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PersistError> {
        // `_` is a LIKE wildcard and shows up in every key, so compare the
        // prefix literally.
        let prefix = prefix.to_string();
        let keys = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT key FROM view_state
                     WHERE substr(key, 1, length(?1)) = ?1
                     ORDER BY key",
                )?;
                let rows = stmt.query_map([&prefix], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await
            .map_err(SettingsError::from)?;
        Ok(keys)
    }
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        assert_eq!(backend.get_bytes("a").await.unwrap(), None);

        backend.set_bytes("a", b"one".to_vec()).await.unwrap();
        backend.set_bytes("a", b"two".to_vec()).await.unwrap();
        assert_eq!(backend.get_bytes("a").await.unwrap(), Some(b"two".to_vec()));

        backend.delete("a").await.unwrap();
        backend.delete("a").await.unwrap();
        assert_eq!(backend.get_bytes("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_prefix_is_literal() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        for key in ["datagrid_a_sorting", "datagrid_ab_sorting", "datagridXa_sorting"] {
            backend.set_bytes(key, Vec::new()).await.unwrap();
        }
        assert_eq!(
            backend.keys_with_prefix("datagrid_a_").await.unwrap(),
            vec!["datagrid_a_sorting"]
        );
        assert_eq!(backend.keys_with_prefix("datagrid_").await.unwrap().len(), 2);
    }
}
