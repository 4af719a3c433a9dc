//! Feedback events
//!
//! The simulation announces discrete moments (gem pickups, screen changes,
//! maneuvers) to a sink. Sinks are fire-and-forget: they return nothing and
//! must not block the tick.

use crate::settings::Settings;
use crate::sim::Screen;

/// Feedback event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Gem picked up
    GemCollect,
    /// Jump started
    Jump,
    /// Slide started
    Slide,
    /// A screen became active
    ScreenEnter(Screen),
    /// One second of the get-ready countdown elapsed
    CountdownTick,
    /// Correct trap symbol entered
    GlyphAccepted,
}

/// Receiver of feedback events
pub trait FeedbackSink {
    fn notify(&mut self, effect: SoundEffect);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&mut self, _effect: SoundEffect) {}
}

/// Records events in order
impl FeedbackSink for Vec<SoundEffect> {
    fn notify(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}

/// Writes events to the log at the configured volume
#[derive(Debug, Clone)]
pub struct LogFeedback {
    volume: f32,
}

impl LogFeedback {
    pub fn new(settings: &Settings) -> Self {
        Self {
            volume: settings.effective_volume(),
        }
    }
}

impl FeedbackSink for LogFeedback {
    fn notify(&mut self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        log::debug!("♪ {:?} (volume {:.2})", effect, self.volume);
    }
}
