//! Input Capture and Normalization
//!
//! Held keys are packed as bit flags; an optional touch joystick vector
//! overrides the keyboard direction. `InputFrame::resolve` turns one
//! frame of raw input into an `Intent` the tick consumes.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;

// =============================================================================
// KEYS
// =============================================================================

/// Logical keys the simulation understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Key {
    /// W / ArrowUp
    Up = 0,
    /// S / ArrowDown
    Down = 1,
    /// A / ArrowLeft
    Left = 2,
    /// D / ArrowRight
    Right = 3,
    /// Space
    Squat = 4,
    /// K
    Throw = 5,
    /// L
    Bomb = 6,
}

impl Key {
    /// Bit for this key inside `InputFrame::keys`.
    #[inline]
    pub const fn flag(self) -> u8 {
        1 << (self as u8)
    }

    /// Map a browser-style key name (case-insensitive) to a key.
    pub fn from_name(name: &str) -> Option<Key> {
        match name.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Some(Key::Up),
            "s" | "arrowdown" => Some(Key::Down),
            "a" | "arrowleft" => Some(Key::Left),
            "d" | "arrowright" => Some(Key::Right),
            " " | "space" => Some(Key::Squat),
            "k" => Some(Key::Throw),
            "l" => Some(Key::Bomb),
            _ => None,
        }
    }
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Raw input state for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Held keys, one bit per `Key`
    pub keys: u8,

    /// Touch joystick, each component nominally in [-1, 1]
    pub joystick: Option<Vec2>,
}

impl InputFrame {
    /// Create an empty input frame.
    pub const fn new() -> Self {
        Self {
            keys: 0,
            joystick: None,
        }
    }

    /// Create a frame with the given keys held.
    pub fn with_keys(keys: &[Key]) -> Self {
        let mut frame = Self::new();
        for &key in keys {
            frame.press(key);
        }
        frame
    }

    /// Create a frame with only a joystick vector.
    pub fn with_joystick(x: f32, y: f32) -> Self {
        Self {
            keys: 0,
            joystick: Some(Vec2::new(x, y)),
        }
    }

    /// Mark a key as held.
    #[inline]
    pub fn press(&mut self, key: Key) {
        self.keys |= key.flag();
    }

    /// Mark a key as released.
    #[inline]
    pub fn release(&mut self, key: Key) {
        self.keys &= !key.flag();
    }

    /// Check if a key is held.
    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.keys & key.flag() != 0
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.keys == 0 && self.joystick_vector().is_zero()
    }

    /// Joystick vector with non-finite components zeroed and each
    /// component clamped into [-1, 1].
    pub fn joystick_vector(&self) -> Vec2 {
        match self.joystick {
            Some(v) => Vec2::new(sanitize_axis(v.x), sanitize_axis(v.y)),
            None => Vec2::ZERO,
        }
    }

    /// Keyboard direction, diagonals normalized to unit length.
    pub fn keyboard_vector(&self) -> Vec2 {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.is_held(Key::Up) {
            dy -= 1.0;
        }
        if self.is_held(Key::Down) {
            dy += 1.0;
        }
        if self.is_held(Key::Left) {
            dx -= 1.0;
        }
        if self.is_held(Key::Right) {
            dx += 1.0;
        }
        let v = Vec2::new(dx, dy);
        if dx != 0.0 && dy != 0.0 {
            v.normalize()
        } else {
            v
        }
    }

    /// Resolve into this frame's intent.
    ///
    /// A non-zero joystick replaces the keyboard direction outright.
    pub fn resolve(&self) -> Intent {
        let joystick = self.joystick_vector();
        let direction = if joystick.is_zero() {
            self.keyboard_vector()
        } else {
            joystick
        };

        Intent {
            direction,
            squat: self.is_held(Key::Squat),
            throw: self.is_held(Key::Throw),
            bomb: self.is_held(Key::Bomb),
        }
    }
}

#[inline]
fn sanitize_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Movement direction and action triggers for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    /// Unscaled movement direction
    pub direction: Vec2,
    /// Start the squat
    pub squat: bool,
    /// Throw a dumbbell
    pub throw: bool,
    /// Place a bomb
    pub bomb: bool,
}

// =============================================================================
// TESTS
// =============================================================================
