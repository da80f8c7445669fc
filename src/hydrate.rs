//! Startup hydration: rebuild the library from the metadata snapshot, then
//! reattach audio payloads from the blob store.
//!
//! Nothing here fails startup. An unreadable snapshot is discarded, and an
//! unreachable blob store leaves the library browsable but unplayable.

use log::{debug, info, warn};

use crate::{
    domain::track::TrackId,
    library::Library,
    storage::{BlobStore, MetadataStore, StorageError, Stores},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotStatus {
    Loaded,
    /// Nothing stored yet, or no metadata store.
    Missing,
    /// Stored value was unreadable and was ignored.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationReport {
    pub snapshot: SnapshotStatus,
    pub attached: usize,
    /// Tracks still without a payload after hydration.
    pub missing: Vec<TrackId>,
    pub blob_store_available: bool,
}

pub async fn load_library(metadata: Option<&dyn MetadataStore>) -> (Library, SnapshotStatus) {
    let Some(store) = metadata else {
        return (Library::new(), SnapshotStatus::Missing);
    };
    match store.load().await {
        Ok(Some(snapshot)) => (Library::from_snapshot(snapshot), SnapshotStatus::Loaded),
        Ok(None) => (Library::new(), SnapshotStatus::Missing),
        Err(e @ StorageError::CorruptSnapshot(_)) => {
            warn!("Discarding stored library: {e}");
            (Library::new(), SnapshotStatus::Discarded)
        }
        Err(e) => {
            warn!("Could not read stored library, starting empty: {e}");
            (Library::new(), SnapshotStatus::Missing)
        }
    }
}

/// Fetches `id`'s blob and attaches it. `Ok(false)` when there is no usable blob.
pub async fn hydrate_track(
    library: &mut Library,
    blobs: &dyn BlobStore,
    id: &TrackId,
) -> Result<bool, StorageError> {
    match blobs.get(id).await {
        Ok(Some(record)) => Ok(library.attach_payload(id, record.payload)),
        Ok(None) => {
            debug!("No stored audio for track {id}");
            Ok(false)
        }
        Err(e @ StorageError::CorruptBlob { .. }) => {
            warn!("{e}, leaving track unplayable");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

pub async fn hydrate(stores: &Stores) -> (Library, HydrationReport) {
    let (mut library, snapshot) = load_library(stores.metadata.as_deref()).await;

    let mut attached = 0;
    let mut blob_store_available = stores.blobs.is_some();
    if let Some(blobs) = stores.blobs.as_deref() {
        for id in library.tracks_missing_payload() {
            match hydrate_track(&mut library, blobs, &id).await {
                Ok(true) => attached += 1,
                Ok(false) => {}
                Err(e) if e.is_unavailable() => {
                    warn!("Blob store unavailable, continuing without audio: {e}");
                    blob_store_available = false;
                    break;
                }
                Err(e) => warn!("Could not load audio for track {id}: {e}"),
            }
        }
    }

    let missing = library.tracks_missing_payload();
    info!(
        "Hydrated {} tracks ({attached} playable, {} without audio)",
        library.len(),
        missing.len()
    );
    (
        library,
        HydrationReport {
            snapshot,
            attached,
            missing,
            blob_store_available,
        },
    )
}
