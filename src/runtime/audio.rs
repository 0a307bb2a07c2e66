//! Audio sinks
//!
//! Sounds are fire-and-forget: a sink never reports failure back to the
//! runner.

use tracing::debug;

use crate::game::events::SoundId;

/// Plays sound effects.
pub trait AudioSink: Send {
    /// Play `sound`. Must not block.
    fn play(&mut self, sound: SoundId);
}

/// Sink that logs each sound at debug level.
#[derive(Debug, Default)]
pub struct TracingAudio {
    muted: bool,
}

impl TracingAudio {
    /// Create an unmuted sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute or unmute.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Whether sounds are suppressed.
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl AudioSink for TracingAudio {
    fn play(&mut self, sound: SoundId) {
        if self.muted {
            return;
        }
        debug!(%sound, "Sound");
    }
}

/// Sink that remembers every sound, in order.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    /// Sounds played so far
    pub played: Vec<SoundId>,
}

impl RecordingAudio {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `sound` was played.
    pub fn count(&self, sound: SoundId) -> usize {
        self.played.iter().filter(|s| **s == sound).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: SoundId) {
        self.played.push(sound);
    }
}
