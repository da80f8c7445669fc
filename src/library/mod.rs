//! Library model: tracks, playlists, recent list and their persisted snapshot.

mod model;
pub mod playlists;
pub mod recent;
pub mod snapshot;

pub use model::Library;
pub use playlists::{ALL_SONGS, Playlist, Playlists};
pub use recent::{RECENT_LIMIT, RecentList};
pub use snapshot::LibrarySnapshot;
