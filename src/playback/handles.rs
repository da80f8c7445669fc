use log::debug;
use uuid::Uuid;

use crate::domain::track::{AudioPayload, TrackId};

/// Revocable reference to a payload, handed to the media element as its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHandle {
    serial: u64,
    track_id: TrackId,
    uri: String,
    payload: AudioPayload,
}

impl SourceHandle {
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn track_id(&self) -> &TrackId {
        &self.track_id
    }

    /// `blob:` style URI naming this handle
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn payload(&self) -> &AudioPayload {
        &self.payload
    }
}

/// Owner of the one live source handle.
///
/// Acquiring always releases the previous handle first, whether it was for
/// another track or the same one.
#[derive(Debug, Default)]
pub struct HandleTable {
    active: Option<SourceHandle>,
    next_serial: u64,
    acquired: u64,
    released: u64,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, track_id: &TrackId, payload: &AudioPayload) -> &SourceHandle {
        self.release();

        self.next_serial += 1;
        self.acquired += 1;
        let handle = SourceHandle {
            serial: self.next_serial,
            track_id: track_id.clone(),
            uri: format!("blob:glassdeck/{}", Uuid::new_v4()),
            payload: payload.clone(),
        };
        debug!("Acquired source {} for track {track_id}", handle.uri);
        self.active.insert(handle)
    }

    pub fn release(&mut self) -> Option<SourceHandle> {
        let handle = self.active.take()?;
        self.released += 1;
        debug!("Released source {} for track {}", handle.uri, handle.track_id);
        Some(handle)
    }

    pub fn active(&self) -> Option<&SourceHandle> {
        self.active.as_ref()
    }

    /// Handles acquired and not yet released. Never more than one.
    pub fn live_count(&self) -> u64 {
        self.acquired - self.released
    }
}
