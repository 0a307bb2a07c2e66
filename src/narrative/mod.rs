//! Narrative Generation
//!
//! The narrator is an external text service keyed by game situation.
//! Requests run in the background (see `dispatcher`); the simulation never
//! waits on them and failures degrade to fixed fallback lines.
//!
//! ## Module Structure
//!
//! - `dispatcher`: Background requests, timeouts, newest-wins delivery
//! - `scripted`: Offline provider with canned lines

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::game::events::NarrativeSituation;

pub mod dispatcher;
pub mod scripted;

pub use dispatcher::{NarrativeDispatcher, NarrativeUpdate};
pub use scripted::ScriptedNarrator;

/// Shown when the provider fails or times out.
pub const FALLBACK_ERROR: &str = "The darkness consumes... (AI Error)";

/// Shown when the provider answers with nothing.
pub const FALLBACK_EMPTY: &str = "Survive.";

/// One request to the narrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    /// What just happened
    pub situation: NarrativeSituation,
    /// Wave at request time
    pub wave: u32,
    /// Score at request time
    pub score: u32,
}

/// Narrative provider errors.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    /// Provider is not reachable or not configured.
    #[error("narrator unavailable: {0}")]
    Unavailable(String),

    /// Provider answered with an error.
    #[error("narrator failed: {0}")]
    Provider(String),

    /// No answer within the configured timeout.
    #[error("narrator timed out after {0:?}")]
    Timeout(Duration),
}

/// A source of narrator lines.
///
/// Implementations may be slow or fail; callers never block the
/// simulation on them.
pub trait NarrativeProvider: Send + Sync {
    /// Produce one line for `request`.
    fn generate(&self, request: NarrativeRequest) -> BoxFuture<'_, Result<String, NarrativeError>>;
}

/// Turn a provider result into display text, applying the fallbacks.
pub fn resolve_text(situation: NarrativeSituation, result: Result<String, NarrativeError>) -> String {
    match result {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                FALLBACK_EMPTY.to_string()
            } else {
                text.to_string()
            }
        }
        Err(e) => {
            warn!(%situation, error = %e, "Narrative request failed");
            FALLBACK_ERROR.to_string()
        }
    }
}
