use std::sync::Arc;

use log::{info, warn};

use crate::config::StorageConfig;

pub mod blob;
pub mod db;
pub mod error;
pub mod metadata;
pub(crate) mod schema;

pub use blob::{BlobRecord, BlobStore, SqliteBlobStore};
pub use error::StorageError;
pub use metadata::{MetadataStore, SqliteMetadataStore};

/// Store handles the player runs with. A missing store means the player
/// degrades to in-memory behaviour for that concern.
#[derive(Clone, Default)]
pub struct Stores {
    pub metadata: Option<Arc<dyn MetadataStore>>,
    pub blobs: Option<Arc<dyn BlobStore>>,
}

impl Stores {
    pub fn new(metadata: Arc<dyn MetadataStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            metadata: Some(metadata),
            blobs: Some(blobs),
        }
    }

    /// No persistence at all.
    pub fn in_memory_only() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("metadata", &self.metadata.is_some())
            .field("blobs", &self.blobs.is_some())
            .finish()
    }
}

/// Opens the SQLite backend for both stores.
///
/// Failure to open is not fatal: it is logged and no stores are returned.
pub fn open_stores(config: &StorageConfig) -> Stores {
    match db::open(config) {
        Ok(conn) => {
            info!(
                "Opened {} storage, namespace '{}'",
                if config.in_memory { "in-memory" } else { "on-disk" },
                config.namespace
            );
            Stores::new(
                Arc::new(SqliteMetadataStore::new(conn.clone(), &config.namespace)),
                Arc::new(SqliteBlobStore::new(conn)),
            )
        }
        Err(e) => {
            warn!("Storage unavailable, continuing in memory only: {e}");
            Stores::in_memory_only()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_stores_degrades_on_failure() {
        let config = StorageConfig {
            in_memory: false,
            path: Some("/nonexistent-dir/for/sure/player.db".into()),
            ..Default::default()
        };
        let stores = open_stores(&config);
        assert!(stores.metadata.is_none());
        assert!(stores.blobs.is_none());
    }

    #[test]
    fn test_open_stores_in_memory() {
        let stores = open_stores(&StorageConfig::default());
        assert!(stores.metadata.is_some());
        assert!(stores.blobs.is_some());
    }
}
