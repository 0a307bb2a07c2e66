//! Core primitives.
//!
//! Geometry and randomness shared by every simulation module.

pub mod vec2;
pub mod rng;

// Re-export core types
pub use vec2::Vec2;
pub use rng::SimRng;
