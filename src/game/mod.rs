//! Game Logic Module
//!
//! All game simulation code. Synchronous and single-threaded: `tick`
//! owns the state for the duration of a frame.
//!
//! ## Module Structure
//!
//! - `input`: Key flags, joystick sanitising, intent resolution
//! - `state`: Entities, session, `SimState`, frame snapshots
//! - `tick`: Per-frame orchestration and `SimConfig`
//! - `ability`: Squat shockwave, dumbbell throw, protein bomb
//! - `companion`: Kitten follow and laser
//! - `enemy`: Zombie seek, contact damage, spawner
//! - `projectile`: Shockwave / dumbbell / bomb updates
//! - `progression`: Waves, levels, low-health narrative
//! - `collision`: Strict radius checks and knockback
//! - `effects`: Particles, floating text, camera shake
//! - `events`: Sound / narrative / gameplay events

pub mod input;
pub mod state;
pub mod tick;
pub mod collision;
pub mod ability;
pub mod companion;
pub mod effects;
pub mod enemy;
pub mod projectile;
pub mod progression;
pub mod events;

// Re-export key types
pub use input::{InputFrame, Intent, Key};
pub use state::{FrameSnapshot, GameSession, SessionPhase, SimState};
pub use tick::{tick, SimConfig, TickResult};
pub use events::{GameEvent, GameEventData, NarrativeSituation, SoundId};
