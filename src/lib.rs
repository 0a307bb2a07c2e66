//! # Zombie Gym
//!
//! Simulation core for Zombie Gym, a top-down survival arcade game: a
//! fitness-obsessed player and a laser kitten hold off waves of zombies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ZOMBIE GYM                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── vec2.rs     - 2D float vector                           │
//! │  └── rng.rs      - Seeded Xoroshiro128+ PRNG                 │
//! │                                                              │
//! │  game/           - Simulation (synchronous)                  │
//! │  ├── input.rs    - Keyboard / joystick intent                │
//! │  ├── state.rs    - Entities, session, snapshots              │
//! │  ├── tick.rs     - Per-frame orchestration                   │
//! │  ├── ability.rs  - Squat, dumbbell, protein bomb             │
//! │  ├── companion.rs- Kitten follow and laser                   │
//! │  ├── enemy.rs    - Zombie seek and spawner                   │
//! │  ├── projectile.rs- Projectile updates                       │
//! │  ├── progression.rs- Waves and levels                        │
//! │  ├── collision.rs- Radius checks, knockback                  │
//! │  ├── effects.rs  - Particles, floating text, shake           │
//! │  └── events.rs   - Sound / narrative / gameplay events       │
//! │                                                              │
//! │  narrative/      - Narrator (async)                          │
//! │  ├── dispatcher.rs- Background requests, newest wins         │
//! │  └── scripted.rs - Offline narrator                          │
//! │                                                              │
//! │  runtime/        - Frame loop (async)                        │
//! │  ├── config.rs   - RuntimeConfig, env loading                │
//! │  ├── audio.rs    - Audio sinks                               │
//! │  └── runner.rs   - GameRunner                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Threading
//!
//! `game/` never blocks and never fails: `tick` takes `&mut SimState`
//! and runs to completion. Narrator calls happen on tokio tasks and reach
//! the state only through `GameSession::apply_narrative`, between ticks.
//!
//! Given the same seed and inputs the simulation replays identically.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod narrative;
pub mod runtime;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::rng::SimRng;
pub use game::input::{InputFrame, Key};
pub use game::state::{FrameSnapshot, SimState};
pub use game::tick::{tick, SimConfig};
pub use runtime::{GameRunner, RuntimeConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// World width
pub const WORLD_WIDTH: f32 = 800.0;

/// World height
pub const WORLD_HEIGHT: f32 = 600.0;

/// Minimum distance between the player and the world edge
pub const PLAYER_MARGIN: f32 = 20.0;
