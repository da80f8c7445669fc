//! Transport: the single media element, its source handles and the
//! playback session.

mod controller;
pub mod handles;
pub mod media;
mod time;

pub use controller::{
    Direction, PlaybackController, PlaybackError, PlaybackSession, TransportState, next_in_order,
};
pub use handles::{HandleTable, SourceHandle};
pub use media::{MediaElement, MediaEvent};
pub use time::format_time;
