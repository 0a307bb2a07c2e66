//! Game Runner
//!
//! Owns one `SimState` and drives it at a fixed rate on the tokio runtime.
//! Per tick: apply finished narrative lines, run the tick, then route its
//! sound events to the audio sink and its narrative requests to the
//! dispatcher.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::audio::AudioSink;
use super::config::RuntimeConfig;
use super::RuntimeError;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::InputFrame;
use crate::game::state::{FrameSnapshot, SimState};
use crate::game::tick::{tick, TickResult};
use crate::narrative::dispatcher::{apply_update, NarrativeDispatcher};
use crate::narrative::{NarrativeProvider, NarrativeRequest};

/// Grace on top of the narrative timeout when settling at shutdown.
const SETTLE_GRACE: Duration = Duration::from_millis(250);

/// Why `run` returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The player died
    GameOver,
    /// `max_ticks` reached
    MaxTicks,
    /// Shutdown signal received
    Shutdown,
}

/// Outcome of a run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    /// Session ID
    pub session_id: Uuid,
    /// Frames simulated in this game
    pub frames: u64,
    /// Final score
    pub score: u32,
    /// Final wave
    pub wave: u32,
    /// Final level
    pub level: u32,
    /// Why the run ended
    pub stop_reason: StopReason,
}

/// Remote control for a running `GameRunner`.
#[derive(Clone, Debug)]
pub struct RunnerHandle {
    shutdown_tx: broadcast::Sender<()>,
    stop_requested: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
}

impl RunnerHandle {
    /// Stop the run loop before its next tick. Sent before `run`, it
    /// stops the next run before its first tick.
    pub fn shutdown(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    /// Hold the simulation. Ticks are skipped until `resume`.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Continue after `pause`.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Whether the loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Drives one game session.
pub struct GameRunner<A: AudioSink> {
    session_id: Uuid,
    config: RuntimeConfig,
    state: SimState,
    dispatcher: NarrativeDispatcher,
    audio: A,
    shutdown_tx: broadcast::Sender<()>,
    stop_requested: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
}

impl<A: AudioSink> GameRunner<A> {
    /// Create an idle runner. Without a configured seed the RNG is seeded
    /// from the session ID.
    pub fn new(config: RuntimeConfig, provider: Arc<dyn NarrativeProvider>, audio: A) -> Self {
        let session_id = Uuid::new_v4();
        let seed = config.seed.unwrap_or_else(|| seed_from_session(session_id));
        let state = config.sim.new_state(seed);
        let dispatcher = NarrativeDispatcher::new(provider, config.narrative_timeout);
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            session_id,
            config,
            state,
            dispatcher,
            audio,
            shutdown_tx,
            stop_requested: Arc::new(AtomicBool::new(false)),
            paused: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Begin a new game (also after a game over).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        self.state.start_new_game();
        info!(
            session = %self.session_id,
            seed = self.state.rng_seed,
            "New game started"
        );

        let events = self.state.take_events();
        self.route_events(&events);
    }

    /// Advance one frame.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn step(&mut self, input: &InputFrame) -> TickResult {
        self.dispatcher.apply_ready(&mut self.state.session);

        let result = tick(&mut self.state, input, &self.config.sim);
        self.route_events(&result.events);

        if result.wave_advanced {
            info!(
                session = %self.session_id,
                wave = self.state.session.wave,
                level = self.state.session.level,
                score = self.state.session.score,
                "Wave advanced"
            );
        }
        if result.game_over {
            info!(
                session = %self.session_id,
                score = self.state.session.score,
                wave = self.state.session.wave,
                frame = self.state.frame,
                "Game over"
            );
        }

        result
    }

    fn route_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match &event.data {
                GameEventData::Sound { sound } => {
                    self.audio.play(*sound);
                }
                GameEventData::NarrativeRequested { situation, wave, score } => {
                    let seq = self.dispatcher.request(NarrativeRequest {
                        situation: *situation,
                        wave: *wave,
                        score: *score,
                    });
                    self.state.session.note_narrative_request(seq);
                }
                other => {
                    debug!(frame = event.frame, event = ?other, "Game event");
                }
            }
        }
    }

    /// Run at the configured tick rate until game over, `max_ticks` or
    /// shutdown. Starts a new game first unless one is in progress.
    ///
    /// `inputs` is called once per tick with the frame about to run.
    #[instrument(skip(self, inputs), fields(session = %self.session_id))]
    pub async fn run<F>(&mut self, mut inputs: F) -> RunSummary
    where
        F: FnMut(u64) -> InputFrame,
    {
        if !self.state.session.is_playing() {
            self.start();
        }

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut tick_interval = interval(self.config.tick_duration());
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = 0u64;

        let stop_reason = loop {
            // Latched so a signal sent before subscribing still counts
            if self.stop_requested.swap(false, Ordering::SeqCst) {
                info!("Shutdown signal received");
                break StopReason::Shutdown;
            }

            tokio::select! {
                _ = tick_interval.tick() => {}
                _ = shutdown_rx.recv() => continue,
            }

            if self.paused.load(Ordering::SeqCst) {
                continue;
            }

            let input = inputs(self.state.frame + 1);
            let result = self.step(&input);
            ticks += 1;

            if result.game_over {
                break StopReason::GameOver;
            }
            if self.config.max_ticks.is_some_and(|max| ticks >= max) {
                break StopReason::MaxTicks;
            }
        };

        info!(?stop_reason, frames = self.state.frame, "Run finished");
        self.summary(stop_reason)
    }

    /// Wait for outstanding narrative requests and apply their results.
    ///
    /// Bounded by the narrative timeout. Returns how many were applied.
    pub async fn settle_narrative(&mut self) -> usize {
        let limit = self.config.narrative_timeout + SETTLE_GRACE;
        let dispatcher = &mut self.dispatcher;
        let session = &mut self.state.session;

        let drain = async move {
            let mut applied = dispatcher.apply_ready(session);
            while session.narrative_loading() {
                match dispatcher.next().await {
                    Some(update) => {
                        if apply_update(session, update) {
                            applied += 1;
                        }
                    }
                    None => break,
                }
            }
            applied
        };

        match tokio::time::timeout(limit, drain).await {
            Ok(applied) => applied,
            Err(_) => {
                warn!(?limit, "Narrative still loading after settle timeout");
                0
            }
        }
    }

    /// Handle for shutdown and pause from another task.
    pub fn handle(&self) -> RunnerHandle {
        RunnerHandle {
            shutdown_tx: self.shutdown_tx.clone(),
            stop_requested: Arc::clone(&self.stop_requested),
            paused: Arc::clone(&self.paused),
        }
    }

    /// Summary of the current state.
    pub fn summary(&self, stop_reason: StopReason) -> RunSummary {
        RunSummary {
            session_id: self.session_id,
            frames: self.state.frame,
            score: self.state.session.score,
            wave: self.state.session.wave,
            level: self.state.session.level,
            stop_reason,
        }
    }

    /// Session ID.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Configuration in use.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Simulation state.
    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Simulation state, mutably.
    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    /// Presentation snapshot.
    pub fn snapshot(&self) -> FrameSnapshot {
        self.state.snapshot()
    }

    /// Presentation snapshot as pretty JSON.
    pub fn snapshot_json(&self) -> Result<String, RuntimeError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Audio sink.
    pub fn audio(&self) -> &A {
        &self.audio
    }
}

fn seed_from_session(id: Uuid) -> u64 {
    let bits = id.as_u128();
    (bits as u64) ^ ((bits >> 64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::SoundId;
    use crate::game::input::Key;
    use crate::game::state::SessionPhase;
    use crate::narrative::ScriptedNarrator;
    use crate::runtime::audio::RecordingAudio;

    fn runner(config: RuntimeConfig) -> GameRunner<RecordingAudio> {
        GameRunner::new(config, Arc::new(ScriptedNarrator::new()), RecordingAudio::new())
    }

    fn fast_config() -> RuntimeConfig {
        RuntimeConfig {
            tick_rate: 1000,
            seed: Some(99),
            narrative_timeout: Duration::from_millis(500),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_start_routes_sound_and_narrative() {
        let mut runner = runner(fast_config());
        runner.start();

        assert_eq!(runner.audio().played, vec![SoundId::Powerup]);
        assert!(runner.state().session.narrative_loading());

        assert_eq!(runner.settle_narrative().await, 1);
        assert!(!runner.state().session.narrative_loading());
        assert!(runner.state().session.narrative.contains("dead") || runner.state().session.narrative.contains("Stretch"));
    }

    #[tokio::test]
    async fn test_step_game_over_plays_explosion_once() {
        let mut runner = runner(fast_config());
        runner.start();
        runner.state_mut().player.health = 0.0;

        let result = runner.step(&InputFrame::new());
        assert!(result.game_over);
        assert_eq!(runner.state().session.phase, SessionPhase::GameOver);

        // Further steps do nothing
        let result = runner.step(&InputFrame::new());
        assert!(!result.game_over);
        assert_eq!(runner.audio().count(SoundId::Explosion), 1);

        runner.settle_narrative().await;
        assert!(runner.state().session.narrative.contains("leg day"));
    }

    #[tokio::test]
    async fn test_wave_advance_requests_narrative() {
        let mut runner = runner(fast_config());
        runner.start();
        runner.settle_narrative().await;
        runner.state_mut().session.score = 310;

        let result = runner.step(&InputFrame::new());
        assert!(result.wave_advanced);
        assert!(runner.state().session.narrative_loading());

        runner.settle_narrative().await;
        assert!(runner.state().session.narrative.contains("Wave 1 cleared"));
    }

    #[tokio::test]
    async fn test_throw_routes_yeet() {
        let mut runner = runner(fast_config());
        runner.start();

        runner.step(&InputFrame::with_keys(&[Key::Throw]));
        assert_eq!(runner.audio().count(SoundId::Yeet), 1);
    }

    #[tokio::test]
    async fn test_run_stops_at_max_ticks() {
        let config = RuntimeConfig {
            max_ticks: Some(20),
            ..fast_config()
        };
        let mut runner = runner(config);

        let summary = runner.run(|_| InputFrame::new()).await;
        assert_eq!(summary.stop_reason, StopReason::MaxTicks);
        assert_eq!(summary.frames, 20);
        assert_eq!(summary.session_id, runner.session_id());
    }

    #[tokio::test]
    async fn test_run_stops_on_game_over() {
        let mut runner = runner(fast_config());
        runner.start();
        runner.state_mut().player.health = 0.0;

        let summary = runner.run(|_| InputFrame::new()).await;
        assert_eq!(summary.stop_reason, StopReason::GameOver);
        assert_eq!(summary.frames, 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let config = RuntimeConfig {
            tick_rate: 60,
            ..fast_config()
        };
        let mut runner = runner(config);
        let handle = runner.handle();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.shutdown();
        });

        let summary = runner.run(|_| InputFrame::new()).await;
        assert_eq!(summary.stop_reason, StopReason::Shutdown);
    }

    #[tokio::test]
    async fn test_shutdown_before_run_is_kept() {
        let config = RuntimeConfig {
            max_ticks: Some(20),
            ..fast_config()
        };
        let mut runner = runner(config);
        runner.handle().shutdown();

        let summary = runner.run(|_| InputFrame::new()).await;
        assert_eq!(summary.stop_reason, StopReason::Shutdown);
        assert_eq!(summary.frames, 0);

        // Consumed by the first run
        let summary = runner.run(|_| InputFrame::new()).await;
        assert_eq!(summary.stop_reason, StopReason::MaxTicks);
        assert_eq!(summary.frames, 20);
    }

    #[tokio::test]
    async fn test_paused_run_does_not_tick() {
        let mut runner = runner(fast_config());
        let handle = runner.handle();
        handle.pause();
        assert!(handle.is_paused());

        let stopper = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            stopper.shutdown();
        });

        let summary = runner.run(|_| InputFrame::new()).await;
        assert_eq!(summary.stop_reason, StopReason::Shutdown);
        assert_eq!(summary.frames, 0);
    }

    #[tokio::test]
    async fn test_inputs_see_upcoming_frame() {
        let config = RuntimeConfig {
            max_ticks: Some(3),
            ..fast_config()
        };
        let mut runner = runner(config);
        let mut seen = Vec::new();

        runner
            .run(|frame| {
                seen.push(frame);
                InputFrame::new()
            })
            .await;
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_snapshot_json() {
        let mut runner = runner(fast_config());
        runner.start();
        runner.step(&InputFrame::new());

        let json = runner.snapshot_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["frame"], 1);
        assert_eq!(value["phase"], "Playing");
    }

    #[test]
    fn test_configured_seed_is_used() {
        let runner = runner(RuntimeConfig {
            seed: Some(1234),
            ..Default::default()
        });
        assert_eq!(runner.state().rng_seed, 1234);
    }
}
