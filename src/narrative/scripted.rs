//! Offline narrator with canned lines, cycling per situation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};

use super::{NarrativeError, NarrativeProvider, NarrativeRequest};
use crate::game::events::NarrativeSituation;

const START_LINES: &[&str] = &[
    "Rise and grind, Valee. The dead skipped warm-up.",
    "Stretch now. They won't wait.",
];

const LOW_HEALTH_LINES: &[&str] = &[
    "Squat like your life depends on it. It does.",
    "One more rep or one less pulse.",
];

/// Narrator that needs no network.
///
/// Wave and game-over lines quote the request's progress; the other
/// situations rotate through fixed lines.
#[derive(Debug, Default)]
pub struct ScriptedNarrator {
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedNarrator {
    /// Create a narrator that answers immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a narrator that waits `delay` before answering.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of requests served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn line_for(&self, request: &NarrativeRequest, n: usize) -> String {
        match request.situation {
            NarrativeSituation::Start => START_LINES[n % START_LINES.len()].to_string(),
            NarrativeSituation::WaveComplete => format!(
                "Wave {} cleared at {} points. Your gains almost justify the mess.",
                request.wave.saturating_sub(1),
                request.score
            ),
            NarrativeSituation::GameOver => format!(
                "Wave {}, {} points. Should not have skipped leg day.",
                request.wave, request.score
            ),
            NarrativeSituation::LowHealth => LOW_HEALTH_LINES[n % LOW_HEALTH_LINES.len()].to_string(),
        }
    }
}

impl NarrativeProvider for ScriptedNarrator {
    fn generate(&self, request: NarrativeRequest) -> BoxFuture<'_, Result<String, NarrativeError>> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        let line = self.line_for(&request, n);
        let delay = self.delay;

        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(line)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_lines() {
        let narrator = ScriptedNarrator::new();

        let over = narrator
            .generate(NarrativeRequest {
                situation: NarrativeSituation::GameOver,
                wave: 4,
                score: 980,
            })
            .await
            .unwrap();
        assert!(over.contains("Wave 4, 980 points"));

        let start = NarrativeRequest {
            situation: NarrativeSituation::Start,
            wave: 1,
            score: 0,
        };
        let first = narrator.generate(start.clone()).await.unwrap();
        let second = narrator.generate(start).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(narrator.calls(), 3);
    }
}
