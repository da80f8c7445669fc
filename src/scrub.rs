//! Pointer scrubbing over the track-length control.
//!
//! Drag input lands in a single pending slot. The slot is drained at most
//! once per frame tick, so a burst of pointer moves turns into one seek to
//! the latest position. While dragging, the position feed from the media
//! element does not move the scrub indicator.

use std::time::Duration;

use log::debug;
use tokio::time::{Interval, MissedTickBehavior};

/// Horizontal extent of the scrub control, in pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubBounds {
    pub left: f64,
    pub width: f64,
}

impl ScrubBounds {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Percentage of the control under `x`, clamped to `[0, 100]`.
    pub fn percent_at(&self, x: f64) -> f64 {
        if self.width.is_nan() || self.width <= 0.0 || !x.is_finite() {
            return 0.0;
        }
        ((x - self.left) / self.width * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubState {
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekCommand {
    pub percent: f64,
    pub seconds: f64,
}

fn known_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}

#[derive(Debug)]
pub struct ScrubCoordinator {
    state: ScrubState,
    pending: Option<f64>,
    frame_requested: bool,
    display_percent: f64,
}

impl Default for ScrubCoordinator {
    fn default() -> Self {
        Self {
            state: ScrubState::Idle,
            pending: None,
            frame_requested: false,
            display_percent: 0.0,
        }
    }
}

impl ScrubCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScrubState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == ScrubState::Dragging
    }

    /// Where the scrub indicator should be drawn.
    pub fn display_percent(&self) -> f64 {
        self.display_percent
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a drag at `x`. Ignored while the duration is unknown.
    pub fn press(&mut self, x: f64, bounds: ScrubBounds, duration: Option<f64>) -> bool {
        if known_duration(duration).is_none() {
            debug!("Scrub press ignored, duration unknown");
            return false;
        }
        self.state = ScrubState::Dragging;
        self.move_to(x, bounds)
    }

    /// Overwrites the pending target with the pointer's position.
    pub fn move_to(&mut self, x: f64, bounds: ScrubBounds) -> bool {
        if !self.is_dragging() {
            return false;
        }
        let percent = bounds.percent_at(x);
        self.pending = Some(percent);
        self.display_percent = percent;
        self.frame_requested = true;
        true
    }

    /// Pointer up. A target that was already set still fires on the next tick.
    pub fn release(&mut self) {
        if !self.is_dragging() {
            return;
        }
        self.state = ScrubState::Idle;
        if self.pending.is_none() {
            self.frame_requested = false;
        }
    }

    /// Pointer left the control; same as releasing.
    pub fn leave(&mut self) {
        self.release();
    }

    /// Position feed from the transport. Returns false while a drag owns the indicator.
    pub fn on_position_feed(&mut self, percent: f64) -> bool {
        if self.is_dragging() {
            return false;
        }
        if percent.is_finite() {
            self.display_percent = percent.clamp(0.0, 100.0);
        }
        true
    }

    /// Drains the pending slot once per frame.
    pub fn tick(&mut self, duration: Option<f64>) -> Option<SeekCommand> {
        if !std::mem::take(&mut self.frame_requested) {
            return None;
        }
        let percent = self.pending.take()?;
        let Some(duration) = known_duration(duration) else {
            debug!("Dropping scrub target {percent:.1}%, duration unknown");
            return None;
        };
        Some(SeekCommand {
            percent,
            seconds: percent / 100.0 * duration,
        })
    }

    /// Time under the pointer, for the hover tooltip.
    pub fn hover_time(x: f64, bounds: ScrubBounds, duration: Option<f64>) -> Option<f64> {
        let duration = known_duration(duration)?;
        Some(bounds.percent_at(x) / 100.0 * duration)
    }
}

/// Periodic tick for [`ScrubCoordinator::tick`]. Missed ticks are skipped, not
/// replayed. Must be called from within a tokio runtime.
pub fn frame_clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: ScrubBounds = ScrubBounds {
        left: 100.0,
        width: 200.0,
    };

    #[test]
    fn test_burst_within_one_frame_seeks_once_to_latest() {
        let mut scrub = ScrubCoordinator::new();
        let duration = Some(300.0);

        assert!(scrub.press(120.0, BOUNDS, duration));
        for x in [140.0, 180.0, 220.0, 260.0, 280.0] {
            scrub.move_to(x, BOUNDS);
        }

        let seek = scrub.tick(duration).expect("one seek");
        assert_eq!(seek.percent, 90.0);
        assert_eq!(seek.seconds, 270.0);
        assert_eq!(scrub.tick(duration), None);
    }

    #[test]
    fn test_unknown_duration_is_noop() {
        let mut scrub = ScrubCoordinator::new();
        assert!(!scrub.press(150.0, BOUNDS, None));
        assert!(!scrub.move_to(150.0, BOUNDS));
        assert!(!scrub.is_dragging());
        assert_eq!(scrub.tick(None), None);
    }

    #[test]
    fn test_release_with_target_still_fires_once() {
        let mut scrub = ScrubCoordinator::new();
        scrub.press(200.0, BOUNDS, Some(100.0));
        scrub.release();

        assert_eq!(scrub.state(), ScrubState::Idle);
        assert_eq!(scrub.tick(Some(100.0)).map(|s| s.percent), Some(50.0));
        assert_eq!(scrub.tick(Some(100.0)), None);
    }

    #[test]
    fn test_release_after_drained_target_cancels_frame() {
        let mut scrub = ScrubCoordinator::new();
        scrub.press(200.0, BOUNDS, Some(100.0));
        assert!(scrub.tick(Some(100.0)).is_some());
        scrub.leave();
        assert!(!scrub.has_pending());
        assert_eq!(scrub.tick(Some(100.0)), None);
    }

    #[test]
    fn test_feed_ignored_while_dragging() {
        let mut scrub = ScrubCoordinator::new();
        assert!(scrub.on_position_feed(5.0));
        assert_eq!(scrub.display_percent(), 5.0);

        scrub.press(250.0, BOUNDS, Some(60.0));
        assert!(!scrub.on_position_feed(10.0));
        assert_eq!(scrub.display_percent(), 75.0);

        scrub.release();
        assert!(scrub.on_position_feed(12.0));
        assert_eq!(scrub.display_percent(), 12.0);
    }

    #[test]
    fn test_pointer_outside_bounds_is_clamped() {
        assert_eq!(BOUNDS.percent_at(0.0), 0.0);
        assert_eq!(BOUNDS.percent_at(10_000.0), 100.0);
        assert_eq!(ScrubBounds::new(0.0, 0.0).percent_at(5.0), 0.0);
    }

    #[test]
    fn test_hover_time() {
        assert_eq!(ScrubCoordinator::hover_time(150.0, BOUNDS, Some(200.0)), Some(50.0));
        assert_eq!(ScrubCoordinator::hover_time(150.0, BOUNDS, None), None);
        assert_eq!(ScrubCoordinator::hover_time(150.0, BOUNDS, Some(f64::NAN)), None);
    }

    #[tokio::test]
    async fn test_frame_clock_ticks() {
        let mut clock = frame_clock(Duration::from_millis(1));
        clock.tick().await;
        clock.tick().await;
        assert_eq!(clock.missed_tick_behavior(), MissedTickBehavior::Skip);
    }
}
