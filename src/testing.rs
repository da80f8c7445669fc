//! Test doubles shared by the unit tests.

use async_trait::async_trait;

use crate::{
    domain::track::{AudioPayload, TrackId},
    library::LibrarySnapshot,
    playback::{MediaElement, SourceHandle},
    storage::{BlobRecord, BlobStore, MetadataStore, StorageError},
};

/// Media element that records what it was asked to do.
#[derive(Debug, Default)]
pub struct FakeMedia {
    pub source: Option<String>,
    pub sources_set: Vec<String>,
    pub playing: bool,
    pub time: f64,
    pub duration: Option<f64>,
    pub volume: f64,
    pub seeks: Vec<f64>,
}

impl MediaElement for FakeMedia {
    fn set_source(&mut self, source: &SourceHandle) {
        self.source = Some(source.uri().to_string());
        self.sources_set.push(source.uri().to_string());
        self.time = 0.0;
        self.duration = None;
    }

    fn clear_source(&mut self) {
        self.source = None;
        self.duration = None;
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.time = seconds;
        self.seeks.push(seconds);
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }
}

fn unavailable() -> StorageError {
    StorageError::Unavailable("test store is offline".to_string())
}

/// Metadata store whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingMetadataStore;

#[async_trait]
impl MetadataStore for FailingMetadataStore {
    async fn load(&self) -> Result<Option<LibrarySnapshot>, StorageError> {
        Err(unavailable())
    }

    async fn save(&self, _snapshot: &LibrarySnapshot) -> Result<(), StorageError> {
        Err(unavailable())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        Err(unavailable())
    }
}

/// Blob store whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(&self, _id: &TrackId, _payload: &AudioPayload) -> Result<(), StorageError> {
        Err(unavailable())
    }

    async fn get(&self, _id: &TrackId) -> Result<Option<BlobRecord>, StorageError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: &TrackId) -> Result<(), StorageError> {
        Err(unavailable())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(unavailable())
    }
}

pub fn payload(bytes: &[u8], file_name: &str) -> AudioPayload {
    AudioPayload::new(bytes.to_vec(), None, file_name)
}
