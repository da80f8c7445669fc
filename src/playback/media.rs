use super::handles::SourceHandle;

/// The host's playable-media resource (an `<audio>` element or similar).
///
/// It plays whatever source handle it was last given and reports progress
/// back through [`MediaEvent`]s delivered to the player.
pub trait MediaElement {
    fn set_source(&mut self, source: &SourceHandle);

    /// Detaches the current source, if any.
    fn clear_source(&mut self);

    fn play(&mut self);

    fn pause(&mut self);

    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// `None` until the element has loaded metadata.
    fn duration(&self) -> Option<f64>;

    fn set_volume(&mut self, volume: f64);
}

/// Events emitted by the media element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Periodic position update while playing.
    PositionTick { position: f64 },
    /// The duration became known.
    MetadataReady { duration: f64 },
    /// Playback reached the end of the source.
    Ended,
}
