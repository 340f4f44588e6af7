use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::errors::ClientError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slots, one per database path.
thread_local! {
    static DB_CONNS: RefCell<HashMap<String, Connection>> = RefCell::new(HashMap::new());
}

/// Device-local key/value storage backed by SQLite.
///
/// Cloning is cheap (path only); every thread opens its own connection on first use.
#[derive(Clone, Debug)]
pub struct LocalStore {
    path: String,
}

impl LocalStore {
    /// Open the store and make sure the schema exists.
    pub fn open(path: impl Into<String>) -> Result<Self, ClientError> {
        let store = Self { path: path.into() };
        store.with_conn(|conn| {
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| ClientError::Storage(format!("Failed to apply schema: {e}")))
        })?;
        log::debug!("local store ready at {}", store.path);
        Ok(store)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ClientError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ClientError>,
    {
        DB_CONNS
            .try_with(|cell| {
                let mut slots = cell.borrow_mut();
                if !slots.contains_key(&self.path) {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| ClientError::Storage(format!("Open DB failed: {e}")))?;
                    slots.insert(self.path.clone(), conn);
                }
                match slots.get_mut(&self.path) {
                    Some(conn) => f(conn),
                    None => Err(ClientError::Storage("connection slot missing".into())),
                }
            })
            .map_err(|_| ClientError::Storage("thread-local connection unavailable".into()))?
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<String>, ClientError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ClientError::Storage(format!("read {key} failed: {e}")))
        })
    }

    pub fn put_raw(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let now = Utc::now().naive_utc();
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
                params![key, value, now],
            )
            .map_err(|e| ClientError::Storage(format!("write {key} failed: {e}")))?;
            Ok(())
        })
    }

    pub fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
                .map_err(|e| ClientError::Storage(format!("delete {key} failed: {e}")))?;
            Ok(())
        })
    }

    /// Read and decode a JSON value. A stored value that does not decode is an error.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ClientError> {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| ClientError::Decode(format!("stored {key} is malformed: {e}"))),
            None => Ok(None),
        }
    }

    pub fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ClientError> {
        let raw = serde_json::to_string(value)?;
        self.put_raw(key, &raw)
    }
}
