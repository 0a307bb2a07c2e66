//! Zombie Gym Headless Runner
//!
//! Plays one session with a scripted input pattern and the offline
//! narrator, then prints the final frame snapshot as JSON.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use zombie_gym::{
    TICK_RATE, VERSION,
    game::input::{InputFrame, Key},
    narrative::ScriptedNarrator,
    runtime::{GameRunner, RuntimeConfig, TracingAudio},
};

/// Demo length when `ZOMBIE_GYM_MAX_TICKS` is unset (one minute at 60 Hz).
const DEMO_TICKS: u64 = 3600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Zombie Gym v{}", VERSION);

    let mut config = RuntimeConfig::from_env()?;
    if config.max_ticks.is_none() {
        config.max_ticks = Some(DEMO_TICKS);
    }
    info!(
        "Tick Rate: {} Hz (default {}), max ticks: {:?}",
        config.tick_rate, TICK_RATE, config.max_ticks
    );

    let mut runner = GameRunner::new(config, Arc::new(ScriptedNarrator::new()), TracingAudio::new());
    info!("Session: {}", runner.session_id());

    let handle = runner.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.shutdown();
        }
    });

    let summary = runner.run(scripted_input).await;
    runner.settle_narrative().await;

    info!("=== Run Results ===");
    info!(
        "Stopped: {:?} after {} frames. Score {}, wave {}, level {}",
        summary.stop_reason, summary.frames, summary.score, summary.wave, summary.level
    );
    info!("Narrator: {}", runner.state().session.narrative);

    println!("{}", runner.snapshot_json()?);
    Ok(())
}

/// Circle the arena, throwing on a beat, squatting now and then and
/// dropping a bomb whenever it might be ready.
fn scripted_input(frame: u64) -> InputFrame {
    let phase = frame % 240;

    let mut input = if phase < 20 {
        InputFrame::with_keys(&[Key::Squat])
    } else {
        let angle = frame as f32 * 0.02;
        InputFrame::with_joystick(angle.cos(), angle.sin())
    };

    if frame % 50 == 0 {
        input.press(Key::Throw);
    }
    if frame % 300 == 150 {
        input.press(Key::Bomb);
    }
    input
}
