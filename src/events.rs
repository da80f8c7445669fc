use crate::{domain::track::TrackId, playback::TransportState};

/// What the host should react to after a player call: re-render, persist,
/// move the playhead.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Library, playlists, recent list or active playlist changed.
    LibraryChanged,
    /// A new snapshot is waiting in the pending slot.
    PersistRequested,
    NowPlayingChanged(Option<TrackId>),
    TransportChanged(TransportState),
    DurationKnown(f64),
    /// Transport feed. `playhead_percent` is `None` while a drag owns the playhead.
    PositionChanged {
        position: f64,
        duration: Option<f64>,
        playhead_percent: Option<f64>,
    },
    SeekIssued {
        seconds: f64,
    },
}
