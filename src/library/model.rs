use std::collections::HashSet;

use log::{debug, warn};

use crate::{
    domain::track::{AudioPayload, Track, TrackId},
    library::{
        playlists::{ALL_SONGS, Playlists},
        recent::RecentList,
        snapshot::LibrarySnapshot,
    },
};

/// In-memory library: tracks, playlists, recency and the active playlist.
///
/// Every mutation leaves these invariants intact before returning:
/// - "All Songs" holds exactly the library's ids, in insertion order;
/// - playlists and the recent list only reference tracks in the library;
/// - the active playlist exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    tracks: Vec<Track>,
    playlists: Playlists,
    recent: RecentList,
    current_playlist: String,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            playlists: Playlists::default(),
            recent: RecentList::default(),
            current_playlist: ALL_SONGS.to_string(),
        }
    }
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == *id)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.track(id).is_some()
    }

    pub fn playlists(&self) -> &Playlists {
        &self.playlists
    }

    pub fn recent(&self) -> &RecentList {
        &self.recent
    }

    pub fn current_playlist(&self) -> &str {
        &self.current_playlist
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Imports a track under a fresh id.
    ///
    /// Appends it to "All Songs" and, when `target_playlist` names another
    /// existing playlist, to that one too. Without a payload nothing happens.
    pub fn add_track(
        &mut self,
        name: &str,
        file_name: &str,
        payload: Option<AudioPayload>,
        cover_data_uri: &str,
        target_playlist: Option<&str>,
    ) -> Option<TrackId> {
        let payload = payload?;
        let id = TrackId::generate();

        self.tracks.push(Track {
            id: id.clone(),
            name: name.to_string(),
            file_name: file_name.to_string(),
            cover_data_uri: cover_data_uri.to_string(),
            payload: Some(payload),
        });
        self.playlists.all_songs_mut().push(id.clone());

        if let Some(target) = target_playlist.filter(|t| *t != ALL_SONGS) {
            match self.playlists.get_mut(target) {
                Some(list) => {
                    list.push(id.clone());
                }
                None => debug!("import target playlist '{target}' does not exist, skipping"),
            }
        }

        Some(id)
    }

    /// Removes the track from the library, every playlist and the recent list.
    pub fn remove_track(&mut self, id: &TrackId) -> Option<Track> {
        let pos = self.tracks.iter().position(|t| t.id == *id)?;
        let track = self.tracks.remove(pos);
        self.playlists.excise(id);
        self.recent.remove(id);
        Some(track)
    }

    /// Creates an empty playlist and makes it active.
    pub fn create_playlist(&mut self, name: &str) -> bool {
        let name = name.trim();
        if !self.playlists.create(name) {
            return false;
        }
        self.current_playlist = name.to_string();
        true
    }

    pub fn select_playlist(&mut self, name: &str) -> bool {
        if !self.playlists.contains(name) {
            return false;
        }
        self.current_playlist = name.to_string();
        true
    }

    /// Ids of the active playlist in playlist order.
    pub fn active_track_ids(&self) -> Vec<TrackId> {
        if self.current_playlist == ALL_SONGS {
            return self.tracks.iter().map(|t| t.id.clone()).collect();
        }
        self.playlists
            .get(&self.current_playlist)
            .map(|p| p.ids().to_vec())
            .unwrap_or_default()
    }

    /// Active playlist ids whose name or file name contains `query`, ignoring case.
    pub fn filtered_track_ids(&self, query: &str) -> Vec<TrackId> {
        let ids = self.active_track_ids();
        let query = query.to_lowercase();
        if query.is_empty() {
            return ids;
        }
        ids.into_iter()
            .filter(|id| self.track(id).is_some_and(|t| t.matches(&query)))
            .collect()
    }

    /// Moves `id` to the front of the recent list.
    pub fn record_played(&mut self, id: &TrackId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.recent.touch(id.clone());
        true
    }

    pub fn attach_payload(&mut self, id: &TrackId, payload: AudioPayload) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == *id) {
            Some(track) => {
                track.payload = Some(payload);
                true
            }
            None => false,
        }
    }

    pub fn tracks_missing_payload(&self) -> Vec<TrackId> {
        self.tracks
            .iter()
            .filter(|t| t.payload.is_none())
            .map(|t| t.id.clone())
            .collect()
    }

    /// Empties the library back to `{ "All Songs": [] }`.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> LibrarySnapshot {
        LibrarySnapshot {
            library: self.tracks.iter().map(Track::metadata).collect(),
            playlists: self.playlists.clone(),
            recent: self.recent.ids().to_vec(),
            current_playlist: self.current_playlist.clone(),
        }
    }

    /// Rebuilds a library from a persisted snapshot, repairing anything that
    /// would break the invariants. Payloads are left detached.
    pub fn from_snapshot(snapshot: LibrarySnapshot) -> Self {
        let mut seen = HashSet::new();
        let mut tracks = Vec::with_capacity(snapshot.library.len());
        for meta in snapshot.library {
            if seen.insert(meta.id.clone()) {
                tracks.push(Track::from(meta));
            } else {
                warn!("snapshot lists track {} twice, keeping the first", meta.id);
            }
        }

        let mut playlists = snapshot.playlists;
        for list in playlists.iter_mut() {
            let dangling: Vec<TrackId> = list
                .ids()
                .iter()
                .filter(|id| !seen.contains(*id))
                .cloned()
                .collect();
            for id in &dangling {
                list.remove(id);
            }
            if !dangling.is_empty() {
                warn!(
                    "playlist '{}' referenced {} unknown track(s)",
                    list.name,
                    dangling.len()
                );
            }
        }

        let all_songs = playlists.all_songs_mut();
        all_songs.clear();
        for track in &tracks {
            all_songs.push(track.id.clone());
        }

        let recent = RecentList::from_ids(snapshot.recent.into_iter().filter(|id| seen.contains(id)));

        let current_playlist = if playlists.contains(&snapshot.current_playlist) {
            snapshot.current_playlist
        } else {
            ALL_SONGS.to_string()
        };

        Self {
            tracks,
            playlists,
            recent,
            current_playlist,
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let ids: Vec<TrackId> = self.tracks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(self.playlists.all_songs().ids(), ids.as_slice());
        for list in self.playlists.iter() {
            for id in list.ids() {
                assert!(self.contains(id), "playlist {} has dangling {id}", list.name);
            }
        }
        for id in self.recent.ids() {
            assert!(self.contains(id), "recent has dangling {id}");
        }
        assert!(self.playlists.contains(&self.current_playlist));
    }
}
