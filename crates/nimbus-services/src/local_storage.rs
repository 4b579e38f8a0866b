//! Small key-value store on SQLite.
//!
//! Values are opaque strings; callers own their encoding. The connection is
//! shared behind a mutex so clones of the store can be handed to several
//! preference types.

use nimbus_core::{RusqliteErrorExt, StorageError};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct LocalStorage {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStorage {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Unavailable(format!("{}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path).map_err(RusqliteErrorExt::into_storage_error)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;

        tracing::debug!("Opened preferences at {}", path.display());
        Ok(store)
    }

    /// Store that lives only as long as the process (tests, `--ephemeral`).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(RusqliteErrorExt::into_storage_error)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn
            .lock()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS preferences (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(RusqliteErrorExt::into_storage_error)
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock();
        Self::read(&conn, key)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        Self::write(&conn, key, value)
    }

    /// Read-modify-write under one lock; returns the value written.
    pub fn update_item<F>(&self, key: &str, update: F) -> Result<String, StorageError>
    where
        F: FnOnce(Option<String>) -> String,
    {
        let conn = self.conn.lock();
        let current = Self::read(&conn, key)?;
        let next = update(current);
        Self::write(&conn, key, &next)?;
        Ok(next)
    }

    fn read(conn: &Connection, key: &str) -> Result<Option<String>, StorageError> {
        conn.query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(RusqliteErrorExt::into_storage_error)
    }

    fn write(conn: &Connection, key: &str, value: &str) -> Result<(), StorageError> {
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map(|_| ())
        .map_err(RusqliteErrorExt::into_storage_error)
    }
}
