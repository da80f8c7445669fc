//! The application-state owner.
//!
//! `Player` holds the library, the transport and the scrub coordinator, and
//! is the only place that talks to the stores. Every library mutation puts a
//! full snapshot into the pending slot in the same call; `flush` writes the
//! latest one.

use std::{collections::VecDeque, time::Duration};

use log::{debug, info, warn};
use tokio::time::Interval;

use crate::{
    config::PlaybackConfig,
    domain::{
        cover::{CoverImage, cover_data_uri},
        track::{AudioPayload, Track, TrackId, display_name},
    },
    events::PlayerEvent,
    hydrate::{self, HydrationReport},
    library::{Library, LibrarySnapshot},
    playback::{
        Direction, MediaElement, MediaEvent, PlaybackController, PlaybackError, PlaybackSession,
        TransportState, next_in_order,
    },
    scrub::{self, ScrubBounds, ScrubCoordinator, SeekCommand},
    storage::{BlobStore, MetadataStore, Stores},
};

pub struct Player<E: MediaElement> {
    library: Library,
    playback: PlaybackController<E>,
    scrub: ScrubCoordinator,
    stores: Stores,
    search_query: String,
    pending_snapshot: Option<LibrarySnapshot>,
    events: VecDeque<PlayerEvent>,
    frame_interval: Duration,
}

impl<E: MediaElement> Player<E> {
    /// Hydrates the library from `stores` and returns a ready player.
    pub async fn start(stores: Stores, media: E, config: &PlaybackConfig) -> (Self, HydrationReport) {
        let (library, report) = hydrate::hydrate(&stores).await;
        let player = Self {
            library,
            playback: PlaybackController::new(media, config.volume()),
            scrub: ScrubCoordinator::new(),
            stores,
            search_query: String::new(),
            pending_snapshot: None,
            events: VecDeque::new(),
            frame_interval: Duration::from_millis(config.frame_interval_ms),
        };
        (player, report)
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn session(&self) -> &PlaybackSession {
        self.playback.session()
    }

    pub fn transport_state(&self) -> TransportState {
        self.playback.state()
    }

    pub fn now_playing(&self) -> Option<&Track> {
        self.library.track(self.playback.current_track_id()?)
    }

    pub fn scrub(&self) -> &ScrubCoordinator {
        &self.scrub
    }

    pub fn media(&self) -> &E {
        self.playback.media()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Active playlist filtered by the search query.
    pub fn visible_track_ids(&self) -> Vec<TrackId> {
        self.library.filtered_track_ids(&self.search_query)
    }

    pub fn has_pending_snapshot(&self) -> bool {
        self.pending_snapshot.is_some()
    }

    /// Clock for driving [`Player::frame_tick`].
    pub fn frame_clock(&self) -> Interval {
        scrub::frame_clock(self.frame_interval)
    }

    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.events.drain(..).collect()
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.events.push_back(event);
    }

    fn library_changed(&mut self) {
        self.pending_snapshot = Some(self.library.snapshot());
        self.emit(PlayerEvent::LibraryChanged);
        self.emit(PlayerEvent::PersistRequested);
    }

    /// Runs a transport operation and reports what it changed.
    fn with_transport<T>(&mut self, f: impl FnOnce(&mut PlaybackController<E>, &mut Library) -> T) -> T {
        let track_before = self.playback.current_track_id().cloned();
        let state_before = self.playback.state();
        let recent_before = self.library.recent().clone();

        let out = f(&mut self.playback, &mut self.library);

        if *self.library.recent() != recent_before {
            self.library_changed();
        }
        let track_after = self.playback.current_track_id().cloned();
        if track_after != track_before {
            self.emit(PlayerEvent::NowPlayingChanged(track_after));
        }
        let state_after = self.playback.state();
        if state_after != state_before {
            if state_after == TransportState::Idle {
                self.scrub = ScrubCoordinator::new();
            }
            self.emit(PlayerEvent::TransportChanged(state_after));
        }
        out
    }

    /// Writes the latest pending snapshot. Returns whether a write happened.
    pub async fn flush(&mut self) -> bool {
        let Some(snapshot) = self.pending_snapshot.take() else {
            return false;
        };
        let Some(metadata) = self.stores.metadata.clone() else {
            debug!("No metadata store, snapshot kept in memory only");
            return false;
        };
        match metadata.save(&snapshot).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not save library: {e}");
                false
            }
        }
    }

    /// Imports an audio payload. Without a payload nothing happens.
    ///
    /// An empty `name` falls back to the file name without its extension.
    /// The payload is written to the blob store and the snapshot flushed
    /// before this returns.
    pub async fn import_track(
        &mut self,
        name: &str,
        audio: Option<AudioPayload>,
        cover: Option<&CoverImage>,
        target_playlist: Option<&str>,
    ) -> Option<TrackId> {
        let Some(audio) = audio else {
            debug!("Import skipped, no audio selected");
            return None;
        };
        let file_name = audio.file_name.clone();
        let name = display_name(name, &file_name);
        let id = self.library.add_track(
            &name,
            &file_name,
            Some(audio.clone()),
            &cover_data_uri(cover),
            target_playlist,
        )?;
        self.library_changed();
        info!("Imported '{name}' as {id}");

        if let Some(blobs) = self.stores.blobs.clone() {
            if let Err(e) = blobs.put(&id, &audio).await {
                warn!("Could not store audio for {id}, it will not survive a reload: {e}");
            }
        }
        self.flush().await;
        Some(id)
    }

    /// Removes a track everywhere, stopping playback if it is loaded.
    pub async fn remove_track(&mut self, id: &TrackId) -> bool {
        if self.library.remove_track(id).is_none() {
            return false;
        }
        self.with_transport(|playback, _| playback.stop_if_current(id));
        self.library_changed();
        info!("Removed track {id}");

        if let Some(blobs) = self.stores.blobs.clone() {
            if let Err(e) = blobs.delete(id).await {
                warn!("Could not delete stored audio for {id}: {e}");
            }
        }
        self.flush().await;
        true
    }

    pub async fn remove_current(&mut self) -> bool {
        match self.playback.current_track_id().cloned() {
            Some(id) => self.remove_track(&id).await,
            None => false,
        }
    }

    /// Empties the library and both stores.
    pub async fn clear_all(&mut self) {
        self.with_transport(|playback, library| {
            playback.stop();
            library.clear_all();
        });
        self.search_query.clear();
        self.library_changed();
        info!("Cleared library");

        if let Some(blobs) = self.stores.blobs.clone() {
            if let Err(e) = blobs.clear().await {
                warn!("Could not clear stored audio: {e}");
            }
        }
        self.flush().await;
    }

    /// Plays `id`, fetching its payload from the blob store first if it is
    /// not attached yet.
    pub async fn play(&mut self, id: &TrackId) -> Result<(), PlaybackError> {
        match self.with_transport(|playback, library| playback.play(library, id)) {
            Err(PlaybackError::PayloadUnavailable(_)) => {}
            other => return other,
        }

        let unavailable = PlaybackError::PayloadUnavailable(id.clone());
        let Some(blobs) = self.stores.blobs.clone() else {
            return Err(unavailable);
        };
        match hydrate::hydrate_track(&mut self.library, blobs.as_ref(), id).await {
            Ok(true) => {
                debug!("Attached audio for {id} on demand");
                self.with_transport(|playback, library| playback.play(library, id))
            }
            Ok(false) => Err(unavailable),
            Err(e) => {
                warn!("Could not load audio for {id}: {e}");
                Err(unavailable)
            }
        }
    }

    pub fn create_playlist(&mut self, name: &str) -> bool {
        if !self.library.create_playlist(name) {
            return false;
        }
        self.library_changed();
        true
    }

    pub fn select_playlist(&mut self, name: &str) -> bool {
        if !self.library.select_playlist(name) {
            return false;
        }
        self.library_changed();
        true
    }

    /// From `Idle` this starts the first track of the active playlist.
    pub async fn toggle_play_pause(&mut self) -> Result<(), PlaybackError> {
        if self.playback.state() == TransportState::Idle {
            return self.advance(Direction::Forward).await.map(|_| ());
        }
        self.with_transport(|playback, _| playback.toggle_play_pause());
        Ok(())
    }

    /// Plays the neighbour of the current track in the active playlist.
    pub async fn advance(&mut self, direction: Direction) -> Result<TrackId, PlaybackError> {
        let ids = self.library.active_track_ids();
        let next = next_in_order(&ids, self.playback.current_track_id(), direction)
            .ok_or(PlaybackError::EmptyPlaylist)?;
        self.play(&next).await?;
        Ok(next)
    }

    /// Track-end policy: move forward through the active playlist, or stop
    /// when there is no other track to move to.
    async fn on_track_end(&mut self) {
        if self.playback.state() == TransportState::Idle {
            return;
        }
        let current = self.playback.current_track_id().cloned();
        let ids = self.library.active_track_ids();
        match next_in_order(&ids, current.as_ref(), Direction::Forward) {
            Some(next) if Some(&next) != current.as_ref() => {
                if let Err(e) = self.play(&next).await {
                    warn!("Auto-advance stopped: {e}");
                    self.with_transport(|playback, _| playback.stop());
                }
            }
            _ => {
                debug!("No further track to advance to, stopping");
                self.with_transport(|playback, _| playback.stop());
            }
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.playback.set_volume(volume);
    }

    pub fn seek_to(&mut self, seconds: f64) -> bool {
        if !self.playback.seek_to(seconds) {
            return false;
        }
        let seconds = self.playback.session().position_seconds;
        self.emit(PlayerEvent::SeekIssued { seconds });
        true
    }

    pub fn seek_percent(&mut self, percent: f64) -> bool {
        match self.playback.duration() {
            Some(duration) if percent.is_finite() => self.seek_to(percent.clamp(0.0, 100.0) / 100.0 * duration),
            _ => false,
        }
    }

    /// Sets the transient filter. Only a re-render follows, nothing is persisted.
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.trim().to_string();
        self.emit(PlayerEvent::LibraryChanged);
    }

    pub fn scrub_press(&mut self, x: f64, bounds: ScrubBounds) -> bool {
        self.scrub.press(x, bounds, self.playback.duration())
    }

    pub fn scrub_move(&mut self, x: f64, bounds: ScrubBounds) -> bool {
        self.scrub.move_to(x, bounds)
    }

    pub fn scrub_release(&mut self) {
        self.scrub.release();
    }

    pub fn scrub_leave(&mut self) {
        self.scrub.leave();
    }

    pub fn hover_time(&self, x: f64, bounds: ScrubBounds) -> Option<f64> {
        ScrubCoordinator::hover_time(x, bounds, self.playback.duration())
    }

    /// Issues at most one seek for the scrub input gathered since the last tick.
    pub fn frame_tick(&mut self) -> Option<SeekCommand> {
        let command = self.scrub.tick(self.playback.duration())?;
        self.seek_to(command.seconds).then_some(command)
    }

    pub async fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::PositionTick { position } => {
                if !self.playback.on_position_tick(position) {
                    return;
                }
                let session = self.playback.session();
                let (position, duration, percent) =
                    (session.position_seconds, session.duration_seconds, session.percent());
                let playhead_percent = match percent {
                    Some(p) if self.scrub.on_position_feed(p) => Some(p),
                    _ => None,
                };
                self.emit(PlayerEvent::PositionChanged {
                    position,
                    duration,
                    playhead_percent,
                });
            }
            MediaEvent::MetadataReady { duration } => {
                if self.playback.on_metadata_ready(duration) {
                    self.emit(PlayerEvent::DurationKnown(duration));
                }
            }
            MediaEvent::Ended => self.on_track_end().await,
        }
    }
}
