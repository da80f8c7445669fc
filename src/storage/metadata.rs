//! Single-key store for the library snapshot.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use rusqlite::{OptionalExtension, params};

use crate::{
    library::LibrarySnapshot,
    storage::{
        db::{self, SecondsSinceUnix, SharedConnection, i64_seconds_to_local_time},
        error::StorageError,
        schema::{columns::*, tables::*},
    },
};

/// Durable home of the library snapshot.
///
/// Writes are full-snapshot overwrites, so concurrent writers resolve to
/// whichever lands last.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// `Ok(None)` when nothing was saved yet, `CorruptSnapshot` when the
    /// stored value cannot be parsed.
    async fn load(&self) -> Result<Option<LibrarySnapshot>, StorageError>;

    async fn save(&self, snapshot: &LibrarySnapshot) -> Result<(), StorageError>;

    async fn remove(&self) -> Result<(), StorageError>;
}

/// `MetadataStore` backed by the `metadata` table, one row per namespace.
#[derive(Debug, Clone)]
pub struct SqliteMetadataStore {
    conn: SharedConnection,
    key: String,
}

impl SqliteMetadataStore {
    pub fn new(conn: SharedConnection, key: &str) -> Self {
        Self {
            conn,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stores a raw value under the namespace key, bypassing serialization.
    pub async fn save_raw(&self, raw: String) -> Result<(), StorageError> {
        let key = self.key.clone();
        let updated_at = db::now_secs()?;
        db::with_conn(&self.conn, move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {METADATA} ({KEY}, {VALUE}, {UPDATED_AT}) VALUES (?1, ?2, ?3)
                     ON CONFLICT({KEY}) DO UPDATE SET {VALUE} = excluded.{VALUE}, {UPDATED_AT} = excluded.{UPDATED_AT}"
                ),
                params![key, raw, updated_at],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn load_raw(&self) -> Result<Option<String>, StorageError> {
        let key = self.key.clone();
        db::with_conn(&self.conn, move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {VALUE} FROM {METADATA} WHERE {KEY} = ?1"),
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?)
        })
        .await
    }

    /// when the snapshot was last written, in local time
    pub async fn last_saved_at(&self) -> Result<Option<DateTime<Local>>, StorageError> {
        let key = self.key.clone();
        let secs: Option<SecondsSinceUnix> = db::with_conn(&self.conn, move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {UPDATED_AT} FROM {METADATA} WHERE {KEY} = ?1"),
                    params![key],
                    |row| row.get(0),
                )
                .optional()?)
        })
        .await?;

        secs.map(i64_seconds_to_local_time)
            .transpose()
            .map_err(StorageError::Internal)
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn load(&self) -> Result<Option<LibrarySnapshot>, StorageError> {
        match self.load_raw().await? {
            Some(raw) => Ok(Some(LibrarySnapshot::from_json(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &LibrarySnapshot) -> Result<(), StorageError> {
        let raw = snapshot.to_json()?;
        self.save_raw(raw).await
    }

    async fn remove(&self) -> Result<(), StorageError> {
        let key = self.key.clone();
        db::with_conn(&self.conn, move |conn| {
            conn.execute(
                &format!("DELETE FROM {METADATA} WHERE {KEY} = ?1"),
                params![key],
            )?;
            Ok(())
        })
        .await
    }
}
