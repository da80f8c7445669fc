//! Keyed store of audio payloads.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use rusqlite::{OptionalExtension, params};

use crate::{
    domain::{
        hash::PayloadDigest,
        track::{AudioPayload, TrackId},
    },
    storage::{
        db::{self, SharedConnection},
        error::StorageError,
        schema::{columns::*, tables::*},
    },
};

/// One stored payload: `{ id, blob, type, fileName }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRecord {
    pub id: TrackId,
    pub payload: AudioPayload,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, id: &TrackId, payload: &AudioPayload) -> Result<(), StorageError>;

    async fn get(&self, id: &TrackId) -> Result<Option<BlobRecord>, StorageError>;

    async fn delete(&self, id: &TrackId) -> Result<(), StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;
}

/// `BlobStore` backed by the `blobs` table.
#[derive(Debug, Clone)]
pub struct SqliteBlobStore {
    conn: SharedConnection,
}

impl SqliteBlobStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<usize, StorageError> {
        db::with_conn(&self.conn, |conn| {
            let count: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {BLOBS}"), [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
        .await
    }
}

#[async_trait]
impl BlobStore for SqliteBlobStore {
    async fn put(&self, id: &TrackId, payload: &AudioPayload) -> Result<(), StorageError> {
        let track_id = id.to_string();
        let payload = payload.clone();
        let stored_at = db::now_secs()?;
        db::with_conn(&self.conn, move |conn| {
            conn.execute(
                &format!(
                    "INSERT OR REPLACE INTO {BLOBS}
                     ({TRACK_ID}, {DATA}, {MIME_TYPE}, {FILE_NAME}, {DIGEST}, {STORED_AT})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                ),
                params![
                    track_id,
                    &payload.bytes[..],
                    payload.mime_type,
                    payload.file_name,
                    payload.digest().to_hex(),
                    stored_at
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &TrackId) -> Result<Option<BlobRecord>, StorageError> {
        let track_id = id.to_string();
        let row = db::with_conn(&self.conn, move |conn| {
            Ok(conn
                .query_row(
                    &format!(
                        "SELECT {DATA}, {MIME_TYPE}, {FILE_NAME}, {DIGEST} FROM {BLOBS} WHERE {TRACK_ID} = ?1"
                    ),
                    params![track_id],
                    |row| {
                        Ok((
                            row.get::<_, Vec<u8>>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                        ))
                    },
                )
                .optional()?)
        })
        .await?;

        let Some((data, mime_type, file_name, digest_hex)) = row else {
            return Ok(None);
        };

        let payload = AudioPayload::new(Arc::<[u8]>::from(data), Some(&mime_type), &file_name);
        match PayloadDigest::from_hex(&digest_hex) {
            Ok(digest) if digest == payload.digest() => Ok(Some(BlobRecord {
                id: id.clone(),
                payload,
            })),
            Ok(_) => Err(StorageError::CorruptBlob { track: id.clone() }),
            Err(e) => {
                warn!("Table {BLOBS} contains an invalid digest for track {id}: {e}");
                Err(StorageError::CorruptBlob { track: id.clone() })
            }
        }
    }

    async fn delete(&self, id: &TrackId) -> Result<(), StorageError> {
        let track_id = id.to_string();
        db::with_conn(&self.conn, move |conn| {
            conn.execute(
                &format!("DELETE FROM {BLOBS} WHERE {TRACK_ID} = ?1"),
                params![track_id],
            )?;
            Ok(())
        })
        .await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        db::with_conn(&self.conn, |conn| {
            conn.execute(&format!("DELETE FROM {BLOBS}"), [])?;
            Ok(())
        })
        .await
    }
}
