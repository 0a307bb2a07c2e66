//! Runtime Module
//!
//! Async shell around the simulation: fixed-rate loop, narrative dispatch,
//! audio routing, configuration.
//!
//! ## Module Structure
//!
//! - `config`: `RuntimeConfig` and environment loading
//! - `audio`: `AudioSink` trait and sinks
//! - `runner`: `GameRunner` frame loop

pub mod audio;
pub mod config;
pub mod runner;

pub use audio::{AudioSink, RecordingAudio, TracingAudio};
pub use config::RuntimeConfig;
pub use runner::{GameRunner, RunSummary, RunnerHandle, StopReason};

/// Runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A configuration value could not be used.
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig {
        /// Variable or field name
        key: String,
        /// Rejected raw value
        value: String,
    },

    /// Snapshot or config serialization failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
