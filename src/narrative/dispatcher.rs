//! Background Narrative Dispatch
//!
//! Each request runs on its own tokio task with a timeout and reports
//! back over an unbounded channel. In-flight requests are never
//! cancelled. Results carry a sequence number; applying them to a
//! `GameSession` drops anything older than what is already shown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use super::{resolve_text, NarrativeError, NarrativeProvider, NarrativeRequest};
use crate::game::events::NarrativeSituation;
use crate::game::state::GameSession;

/// A finished narrative request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrativeUpdate {
    /// Sequence number assigned at dispatch
    pub seq: u64,
    /// Situation the line was requested for
    pub situation: NarrativeSituation,
    /// Display text (fallbacks already applied)
    pub text: String,
}

/// Fires narrative requests without blocking the caller.
pub struct NarrativeDispatcher {
    provider: Arc<dyn NarrativeProvider>,
    timeout: Duration,
    next_seq: u64,
    tx: mpsc::UnboundedSender<NarrativeUpdate>,
    rx: mpsc::UnboundedReceiver<NarrativeUpdate>,
}

impl NarrativeDispatcher {
    /// Create a dispatcher around `provider`.
    pub fn new(provider: Arc<dyn NarrativeProvider>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            timeout,
            next_seq: 0,
            tx,
            rx,
        }
    }

    /// Start a request in the background and return its sequence number.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn request(&mut self, request: NarrativeRequest) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let timeout = self.timeout;
        let situation = request.situation;

        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, provider.generate(request)).await {
                Ok(result) => result,
                Err(_) => Err(NarrativeError::Timeout(timeout)),
            };
            let text = resolve_text(situation, result);
            // Receiver is gone once the runner shuts down
            let _ = tx.send(NarrativeUpdate { seq, situation, text });
        });

        debug!(seq, %situation, "Narrative requested");
        seq
    }

    /// Next finished update, if one is ready. Never blocks.
    pub fn try_next(&mut self) -> Option<NarrativeUpdate> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished update.
    pub async fn next(&mut self) -> Option<NarrativeUpdate> {
        self.rx.recv().await
    }

    /// Apply every finished update to `session`. Returns how many were applied.
    pub fn apply_ready(&mut self, session: &mut GameSession) -> usize {
        let mut applied = 0;
        while let Some(update) = self.try_next() {
            if apply_update(session, update) {
                applied += 1;
            }
        }
        applied
    }
}

/// Apply one update, dropping it if a newer one is already shown.
pub fn apply_update(session: &mut GameSession, update: NarrativeUpdate) -> bool {
    let NarrativeUpdate { seq, situation, text } = update;
    let applied = session.apply_narrative(seq, text);
    if applied {
        debug!(seq, %situation, "Narrative applied");
    } else {
        debug!(seq, %situation, "Stale narrative dropped");
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::{BoxFuture, FutureExt};
    use crate::narrative::{FALLBACK_EMPTY, FALLBACK_ERROR};

    /// Answers per situation after a per-situation delay.
    struct StubNarrator {
        slow: NarrativeSituation,
        delay: Duration,
        reply: Option<&'static str>,
    }

    impl NarrativeProvider for StubNarrator {
        fn generate(&self, request: NarrativeRequest) -> BoxFuture<'_, Result<String, NarrativeError>> {
            let delay = if request.situation == self.slow {
                self.delay
            } else {
                Duration::from_millis(5)
            };
            let reply = self.reply;
            async move {
                tokio::time::sleep(delay).await;
                match reply {
                    Some("") => Ok("   ".to_string()),
                    Some(text) => Ok(format!("{}:{}", text, request.situation)),
                    None => Err(NarrativeError::Unavailable("offline".into())),
                }
            }
            .boxed()
        }
    }

    fn request(situation: NarrativeSituation) -> NarrativeRequest {
        NarrativeRequest {
            situation,
            wave: 1,
            score: 0,
        }
    }

    #[tokio::test]
    async fn test_newest_request_wins() {
        let provider = Arc::new(StubNarrator {
            slow: NarrativeSituation::Start,
            delay: Duration::from_millis(150),
            reply: Some("ok"),
        });
        let mut dispatcher = NarrativeDispatcher::new(provider, Duration::from_secs(2));
        let mut session = GameSession::new(75.0);

        let old = dispatcher.request(request(NarrativeSituation::Start));
        session.note_narrative_request(old);
        let new = dispatcher.request(request(NarrativeSituation::WaveComplete));
        session.note_narrative_request(new);
        assert!(new > old);
        assert!(session.narrative_loading());

        // Fast newer answer lands first
        let first = dispatcher.next().await.unwrap();
        assert_eq!(first.seq, new);
        assert!(apply_update(&mut session, first));
        assert_eq!(session.narrative, "ok:wave_complete");
        assert!(!session.narrative_loading());

        // Slow older answer is dropped
        let second = dispatcher.next().await.unwrap();
        assert_eq!(second.seq, old);
        assert!(!apply_update(&mut session, second));
        assert_eq!(session.narrative, "ok:wave_complete");
    }

    #[tokio::test]
    async fn test_in_order_results_all_apply() {
        let provider = Arc::new(StubNarrator {
            slow: NarrativeSituation::GameOver,
            delay: Duration::from_millis(5),
            reply: Some("ok"),
        });
        let mut dispatcher = NarrativeDispatcher::new(provider, Duration::from_secs(2));
        let mut session = GameSession::new(75.0);

        let first = dispatcher.request(request(NarrativeSituation::Start));
        let update = dispatcher.next().await.unwrap();
        assert_eq!(update.seq, first);
        assert!(apply_update(&mut session, update));

        dispatcher.request(request(NarrativeSituation::LowHealth));
        let update = dispatcher.next().await.unwrap();
        assert!(apply_update(&mut session, update));
        assert_eq!(session.narrative, "ok:low_health");
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let provider = Arc::new(StubNarrator {
            slow: NarrativeSituation::Start,
            delay: Duration::from_secs(5),
            reply: Some("late"),
        });
        let mut dispatcher = NarrativeDispatcher::new(provider, Duration::from_millis(30));

        dispatcher.request(request(NarrativeSituation::Start));
        let update = dispatcher.next().await.unwrap();
        assert_eq!(update.text, FALLBACK_ERROR);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let provider = Arc::new(StubNarrator {
            slow: NarrativeSituation::Start,
            delay: Duration::from_millis(1),
            reply: None,
        });
        let mut dispatcher = NarrativeDispatcher::new(provider, Duration::from_secs(1));

        dispatcher.request(request(NarrativeSituation::GameOver));
        assert_eq!(dispatcher.next().await.unwrap().text, FALLBACK_ERROR);
    }

    #[tokio::test]
    async fn test_empty_answer_falls_back() {
        let provider = Arc::new(StubNarrator {
            slow: NarrativeSituation::Start,
            delay: Duration::from_millis(1),
            reply: Some(""),
        });
        let mut dispatcher = NarrativeDispatcher::new(provider, Duration::from_secs(1));

        dispatcher.request(request(NarrativeSituation::Start));
        assert_eq!(dispatcher.next().await.unwrap().text, FALLBACK_EMPTY);
    }

    #[tokio::test]
    async fn test_try_next_never_blocks() {
        let provider = Arc::new(StubNarrator {
            slow: NarrativeSituation::Start,
            delay: Duration::from_millis(200),
            reply: Some("ok"),
        });
        let mut dispatcher = NarrativeDispatcher::new(provider, Duration::from_secs(1));
        let mut session = GameSession::new(75.0);

        dispatcher.request(request(NarrativeSituation::Start));
        assert!(dispatcher.try_next().is_none());
        assert_eq!(dispatcher.apply_ready(&mut session), 0);
    }
}
