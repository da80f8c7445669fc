use log::{debug, info};
use thiserror::Error;

use crate::{
    domain::track::TrackId,
    library::{ALL_SONGS, Library},
    playback::{handles::HandleTable, media::MediaElement},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("track {0} has no audio payload attached")]
    PayloadUnavailable(TrackId),

    #[error("track {0} is not in the library")]
    UnknownTrack(TrackId),

    #[error("the active playlist has no tracks")]
    EmptyPlaylist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing loaded.
    Idle,
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub current_track_id: Option<TrackId>,
    /// Playlist that was active when the current track started.
    pub current_playlist_name: String,
    pub is_playing: bool,
    pub position_seconds: f64,
    pub duration_seconds: Option<f64>,
    pub volume: f64,
}

impl PlaybackSession {
    fn new(volume: f64) -> Self {
        Self {
            current_track_id: None,
            current_playlist_name: ALL_SONGS.to_string(),
            is_playing: false,
            position_seconds: 0.0,
            duration_seconds: None,
            volume,
        }
    }

    /// Position as a percentage of the duration, when the duration is known.
    pub fn percent(&self) -> Option<f64> {
        let duration = self.duration_seconds?;
        Some((self.position_seconds / duration * 100.0).clamp(0.0, 100.0))
    }
}

/// Circular step through `ids` from `current`.
///
/// Without a current track (or one outside `ids`) forward starts at the first
/// id and backward at the last.
pub fn next_in_order(ids: &[TrackId], current: Option<&TrackId>, direction: Direction) -> Option<TrackId> {
    if ids.is_empty() {
        return None;
    }
    let len = ids.len();
    let pos = current.and_then(|c| ids.iter().position(|id| id == c));
    let next = match (pos, direction) {
        (Some(p), Direction::Forward) => (p + 1) % len,
        (Some(p), Direction::Backward) => (p + len - 1) % len,
        (None, Direction::Forward) => 0,
        (None, Direction::Backward) => len - 1,
    };
    Some(ids[next].clone())
}

fn usable_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}

/// Owns the media element and the one live source handle, and keeps the
/// playback session in step with them.
#[derive(Debug)]
pub struct PlaybackController<E: MediaElement> {
    media: E,
    handles: HandleTable,
    session: PlaybackSession,
    state: TransportState,
}

impl<E: MediaElement> PlaybackController<E> {
    pub fn new(mut media: E, volume: f64) -> Self {
        media.set_volume(volume);
        Self {
            media,
            handles: HandleTable::new(),
            session: PlaybackSession::new(volume),
            state: TransportState::Idle,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn current_track_id(&self) -> Option<&TrackId> {
        self.session.current_track_id.as_ref()
    }

    pub fn media(&self) -> &E {
        &self.media
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    pub fn duration(&self) -> Option<f64> {
        usable_duration(self.session.duration_seconds.or_else(|| self.media.duration()))
    }

    /// Binds `id`'s payload to the media element and starts playing it.
    pub fn play(&mut self, library: &mut Library, id: &TrackId) -> Result<(), PlaybackError> {
        let track = library
            .track(id)
            .ok_or_else(|| PlaybackError::UnknownTrack(id.clone()))?;
        let payload = track
            .payload
            .clone()
            .ok_or_else(|| PlaybackError::PayloadUnavailable(id.clone()))?;

        let handle = self.handles.acquire(id, &payload);
        self.media.set_source(handle);
        self.media.play();

        library.record_played(id);

        self.session.current_track_id = Some(id.clone());
        self.session.current_playlist_name = library.current_playlist().to_string();
        self.session.is_playing = true;
        self.session.position_seconds = 0.0;
        self.session.duration_seconds = usable_duration(self.media.duration());
        self.state = TransportState::Playing;

        info!("Playing track {id}");
        Ok(())
    }

    /// Flips between playing and paused. Returns false when nothing is loaded.
    pub fn toggle_play_pause(&mut self) -> bool {
        match self.state {
            TransportState::Idle => return false,
            TransportState::Playing => {
                self.media.pause();
                self.session.is_playing = false;
                self.state = TransportState::Paused;
            }
            TransportState::Paused => {
                self.media.play();
                self.session.is_playing = true;
                self.state = TransportState::Playing;
            }
        }
        true
    }

    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.media.set_volume(volume);
        self.session.volume = volume;
    }

    /// Returns false without seeking while the duration is unknown.
    pub fn seek_to(&mut self, seconds: f64) -> bool {
        let Some(duration) = self.duration() else {
            return false;
        };
        if self.state == TransportState::Idle || !seconds.is_finite() {
            return false;
        }
        let seconds = seconds.clamp(0.0, duration);
        self.media.set_current_time(seconds);
        self.session.position_seconds = seconds;
        debug!("Seek to {seconds:.2}s of {duration:.2}s");
        true
    }

    pub fn seek_percent(&mut self, percent: f64) -> bool {
        match self.duration() {
            Some(duration) if percent.is_finite() => {
                self.seek_to(percent.clamp(0.0, 100.0) / 100.0 * duration)
            }
            _ => false,
        }
    }

    /// Unloads the current track and returns to `Idle`.
    pub fn stop(&mut self) {
        self.media.pause();
        self.media.clear_source();
        self.handles.release();
        self.session.current_track_id = None;
        self.session.is_playing = false;
        self.session.position_seconds = 0.0;
        self.session.duration_seconds = None;
        self.state = TransportState::Idle;
    }

    /// Stops the transport if `id` is the loaded track.
    pub fn stop_if_current(&mut self, id: &TrackId) -> bool {
        if self.current_track_id() == Some(id) {
            self.stop();
            return true;
        }
        false
    }

    /// Position feed. Returns false when nothing is loaded.
    pub fn on_position_tick(&mut self, position: f64) -> bool {
        if self.state == TransportState::Idle || !position.is_finite() {
            return false;
        }
        self.session.position_seconds = position.max(0.0);
        if let Some(d) = usable_duration(self.media.duration()) {
            self.session.duration_seconds = Some(d);
        }
        true
    }

    pub fn on_metadata_ready(&mut self, duration: f64) -> bool {
        if self.state == TransportState::Idle {
            return false;
        }
        self.session.duration_seconds = usable_duration(Some(duration));
        self.session.duration_seconds.is_some()
    }

}
