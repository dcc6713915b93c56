//! Favorite-stop persistence.
//!
//! A favorite set is a JSON string list stored under a single key in whatever
//! key-value store the platform provides. Read failures degrade to the empty
//! set and write failures are logged and dropped; the favorites feature is
//! never allowed to take the app down.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use tracing::warn;

use crate::source::BoxFuture;

/// Storage key the favorite list lives under.
pub const FAVORITES_KEY: &str = "torinogo-favorite-stops";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Minimal async key-value storage seam.
///
/// Platform bindings implement this over local storage, async storage, or a
/// database; tests use [`MemoryStore`].
pub trait KeyValueStore: Send + Sync {
    fn load<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<Vec<u8>>, PersistenceError>>;

    fn save<'a>(
        &'a self,
        key: &'a str,
        value: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), PersistenceError>>;

    /// Whether a value is stored under `key`. Backend failures read as false.
    fn exists<'a>(&'a self, key: &'a str) -> BoxFuture<'a, bool>;
}

// ============================================================================
// Backends
// ============================================================================

/// Volatile in-memory backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: tokio::sync::Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<Vec<u8>>, PersistenceError>> {
        Box::pin(async move { Ok(self.entries.lock().await.get(key).cloned()) })
    }

    fn save<'a>(
        &'a self,
        key: &'a str,
        value: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), PersistenceError>> {
        Box::pin(async move {
            self.entries.lock().await.insert(key.to_owned(), value);
            Ok(())
        })
    }

    fn exists<'a>(&'a self, key: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move { self.entries.lock().await.contains_key(key) })
    }
}

/// Durable backend over a single-table SQLite database.
pub struct SqliteStore {
    conn: std::sync::Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, PersistenceError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value BLOB NOT NULL)",
        )?;
        Ok(Self {
            conn: std::sync::Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, PersistenceError> {
        self.conn
            .lock()
            .map_err(|_| PersistenceError::Storage("connection mutex poisoned".into()))
    }
}

impl KeyValueStore for SqliteStore {
    fn load<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<Vec<u8>>, PersistenceError>> {
        Box::pin(async move {
            let conn = self.lock()?;
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                    row.get::<_, Vec<u8>>(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    fn save<'a>(
        &'a self,
        key: &'a str,
        value: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), PersistenceError>> {
        Box::pin(async move {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )?;
            Ok(())
        })
    }

    fn exists<'a>(&'a self, key: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            let Ok(conn) = self.lock() else {
                return false;
            };
            conn.query_row("SELECT 1 FROM kv WHERE key = ?1", [key], |_| Ok(()))
                .optional()
                .map(|row| row.is_some())
                .unwrap_or(false)
        })
    }
}

// ============================================================================
// Favorite set
// ============================================================================

/// The user's favorite stops, with set semantics over any [`KeyValueStore`].
pub struct FavoriteStops<S> {
    store: S,
}

impl<S: KeyValueStore> FavoriteStops<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All favorite stop ids. Read or decode failures yield the empty set.
    pub async fn favorite_ids(&self) -> Vec<String> {
        match self.store.load(FAVORITES_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(ids) => ids,
                Err(err) => {
                    warn!(%err, "favorites payload corrupt; treating as empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "favorites read failed; treating as empty");
                Vec::new()
            }
        }
    }

    /// Add a stop to the favorites. Idempotent.
    pub async fn add(&self, stop_id: &str) {
        let mut ids = self.favorite_ids().await;
        if !ids.iter().any(|id| id == stop_id) {
            ids.push(stop_id.to_owned());
            self.save_ids(&ids).await;
        }
    }

    /// Remove a stop from the favorites. Idempotent.
    pub async fn remove(&self, stop_id: &str) {
        let mut ids = self.favorite_ids().await;
        let before = ids.len();
        ids.retain(|id| id != stop_id);
        if ids.len() != before {
            self.save_ids(&ids).await;
        }
    }

    pub async fn is_favorite(&self, stop_id: &str) -> bool {
        self.favorite_ids().await.iter().any(|id| id == stop_id)
    }

    async fn save_ids(&self, ids: &[String]) {
        let bytes = match serde_json::to_vec(ids) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%err, "favorites encode failed; write dropped");
                return;
            }
        };
        if let Err(err) = self.store.save(FAVORITES_KEY, bytes).await {
            warn!(%err, "favorites write failed; write dropped");
        }
    }
}
