//! Playback-state and persistence layer of a personal music player.
//!
//! The crate keeps an in-memory library model consistent with two async
//! stores (a small metadata snapshot and a blob store for audio payloads),
//! drives a single media element, and coalesces pointer scrubbing into
//! at most one seek per frame tick.

pub mod config;
pub mod domain;
pub mod events;
pub mod hydrate;
pub mod library;
pub mod logging;
pub mod playback;
pub mod player;
pub mod scrub;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use player::Player;
