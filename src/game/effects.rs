//! Cosmetic Effects
//!
//! Particles, floating text and camera shake. Emitters insert into
//! `SimState`; the update functions advance and prune each tick.
//! Nothing here feeds back into gameplay.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::state::{Color, FloatingText, Particle, SimState};

/// Effect palette.
pub mod palette {
    use super::Color;

    /// Zombie skin, hit and death particles
    pub const ZOMBIE_SKIN: Color = Color(0x30D158);
    /// Player shirt, contact damage particles
    pub const SHIRT: Color = Color(0xFF2D55);
    /// Companion collar, wave banner
    pub const COLLAR: Color = Color(0x0A84FF);
    /// Laser beam and "PEW!"
    pub const LASER: Color = Color(0xFF453A);
    /// Dumbbell and "YEET!"
    pub const DUMBBELL: Color = Color(0x8E8E93);
    /// Bomb, blast particles, "PROTEIN BOMB!"
    pub const BOMB: Color = Color(0xFF9F0A);
    /// "CRUNCH"
    pub const WHITE: Color = Color(0xFFFFFF);
    /// Zombie speech bubbles
    pub const DIALOGUE: Color = Color(0x88FF88);

    /// Background tint per level, indexed by `GameSession::level_tint_index`.
    pub const LEVEL_TINTS: [Color; 5] = [
        Color(0x111827),
        Color(0x1F1414),
        Color(0x141F14),
        Color(0x1F1F14),
        Color(0x14141F),
    ];
}

/// Lines a dying zombie may say.
pub const ZOMBIE_QUOTES: [&str; 9] = [
    "Leg day...",
    "Too... cardio...",
    "My gains!",
    "Cheat day?",
    "Oof.",
    "Need protein...",
    "Cramping!",
    "Zero carb...",
    "Bruh.",
];

/// Effect tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EffectsConfig {
    /// Downward acceleration on particles per tick
    pub gravity: f32,
    /// Particle life lost per tick
    pub particle_decay: f32,
    /// Base particle speed (scaled by the emitter's multiplier)
    pub particle_speed: f32,
    /// Upward kick added to every particle
    pub particle_lift: f32,
    /// Particles per melee hit
    pub hit_particles: u32,
    /// Particles per enemy death
    pub death_particles: u32,
    /// Live particle cap; emissions beyond it are dropped
    pub max_particles: usize,
    /// Vertical offset applied to every floating text
    pub text_rise_offset: f32,
    /// Floating text life (ticks)
    pub text_life: u32,
    /// Dialogue text life (ticks)
    pub dialogue_life: u32,
    /// Shake multiplier per tick
    pub shake_decay: f32,
    /// Shake snaps to zero below this
    pub shake_floor: f32,
    /// Shake cap
    pub max_shake: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.35,
            particle_decay: 0.04,
            particle_speed: 4.0,
            particle_lift: 1.5,
            hit_particles: 12,
            death_particles: 25,
            max_particles: 1024,
            text_rise_offset: 40.0,
            text_life: 50,
            dialogue_life: 90,
            shake_decay: 0.9,
            shake_floor: 0.5,
            max_shake: 30.0,
        }
    }
}

// =============================================================================
// EMITTERS
// =============================================================================

/// Burst `count` particles at `position`.
pub fn emit_particles(
    state: &mut SimState,
    position: Vec2,
    color: Color,
    count: u32,
    speed_mult: f32,
    config: &EffectsConfig,
) {
    for _ in 0..count {
        if state.particles.len() >= config.max_particles {
            break;
        }
        let angle = state.rng.next_angle();
        let speed = state.rng.next_f32() * config.particle_speed * speed_mult;
        let velocity = Vec2::from_angle(angle) * speed + Vec2::new(0.0, -config.particle_lift);
        let size = state.rng.next_f32() * 3.0 + 2.0;
        let rotation = state.rng.next_angle();
        let rotation_speed = (state.rng.next_f32() - 0.5) * 0.3;

        state.particles.push(Particle {
            position,
            velocity,
            life: 1.0,
            color,
            size,
            rotation,
            rotation_speed,
        });
    }
}

/// Spawn a floating text above `position`.
pub fn emit_text(
    state: &mut SimState,
    position: Vec2,
    text: impl Into<String>,
    color: Color,
    is_dialogue: bool,
    config: &EffectsConfig,
) {
    let drift = if is_dialogue { 0.2 } else { 1.0 };
    let velocity = Vec2::new(
        (state.rng.next_f32() - 0.5) * drift,
        if is_dialogue { -0.5 } else { -1.5 },
    );
    let life = if is_dialogue { config.dialogue_life } else { config.text_life };

    state.floating_texts.push(FloatingText {
        position: Vec2::new(position.x, position.y - config.text_rise_offset),
        velocity,
        life,
        color,
        opacity: 1.0,
        text: text.into(),
        is_dialogue,
    });
}

/// Add camera shake, capped.
pub fn add_shake(state: &mut SimState, amount: f32, config: &EffectsConfig) {
    state.shake = (state.shake + amount).min(config.max_shake);
}

// =============================================================================
// UPDATE
// =============================================================================

/// Integrate particles and drop the expired ones.
pub fn update_particles(state: &mut SimState, config: &EffectsConfig) {
    for p in &mut state.particles {
        p.position += p.velocity;
        p.velocity.y += config.gravity;
        p.rotation += p.rotation_speed;
        p.life -= config.particle_decay;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Drift floating texts, fade them and drop the expired ones.
pub fn update_floating_texts(state: &mut SimState) {
    for t in &mut state.floating_texts {
        t.position += t.velocity;
        t.life = t.life.saturating_sub(1);
        t.opacity = FloatingText::opacity_for_life(t.life, t.is_dialogue);
    }
    state.floating_texts.retain(|t| t.life > 0);
}

/// Decay camera shake toward zero.
pub fn decay_shake(state: &mut SimState, config: &EffectsConfig) {
    state.shake *= config.shake_decay;
    if state.shake < config.shake_floor {
        state.shake = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> SimState {
        SimState::new(7, 75.0)
    }

    #[test]
    fn test_particle_emission_ranges() {
        let mut state = test_state();
        let config = EffectsConfig::default();
        emit_particles(&mut state, Vec2::new(100.0, 100.0), palette::BOMB, 50, 1.0, &config);

        assert_eq!(state.particles.len(), 50);
        for p in &state.particles {
            assert_eq!(p.life, 1.0);
            assert!((2.0..5.0).contains(&p.size));
            assert!(p.rotation_speed.abs() <= 0.15);
            // Horizontal speed bounded by base speed, vertical includes lift
            assert!(p.velocity.x.abs() <= 4.0);
            assert!(p.velocity.y <= 4.0 - 1.5 && p.velocity.y >= -4.0 - 1.5);
        }
    }

    #[test]
    fn test_particles_fall_and_expire() {
        let mut state = test_state();
        let config = EffectsConfig::default();
        emit_particles(&mut state, Vec2::ZERO, palette::LASER, 5, 1.0, &config);
        let vy_before = state.particles[0].velocity.y;

        update_particles(&mut state, &config);
        assert!((state.particles[0].velocity.y - (vy_before + 0.35)).abs() < 1e-5);

        // life 1.0 at 0.04/tick is gone after 25 ticks
        for _ in 0..25 {
            update_particles(&mut state, &config);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut state = test_state();
        let config = EffectsConfig {
            max_particles: 10,
            ..Default::default()
        };
        emit_particles(&mut state, Vec2::ZERO, palette::BOMB, 30, 2.0, &config);
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_floating_text_lifetimes() {
        let mut state = test_state();
        let config = EffectsConfig::default();
        emit_text(&mut state, Vec2::new(200.0, 200.0), "CRUNCH", palette::WHITE, false, &config);
        emit_text(&mut state, Vec2::new(200.0, 200.0), "Bruh.", palette::DIALOGUE, true, &config);

        assert_eq!(state.floating_texts[0].position.y, 160.0);
        assert_eq!(state.floating_texts[0].life, 50);
        assert_eq!(state.floating_texts[1].life, 90);

        for _ in 0..50 {
            update_floating_texts(&mut state);
        }
        assert_eq!(state.floating_texts.len(), 1);
        let dialogue = &state.floating_texts[0];
        assert!(dialogue.is_dialogue);
        assert_eq!(dialogue.life, 40);
        assert_eq!(dialogue.opacity, 1.0);
    }

    #[test]
    fn test_text_opacity() {
        assert_eq!(FloatingText::opacity_for_life(25, false), 0.5);
        assert_eq!(FloatingText::opacity_for_life(10, true), 0.5);
        assert_eq!(FloatingText::opacity_for_life(80, true), 1.0);
    }

    #[test]
    fn test_shake_cap_and_decay() {
        let mut state = test_state();
        let config = EffectsConfig::default();

        add_shake(&mut state, 25.0, &config);
        add_shake(&mut state, 25.0, &config);
        assert_eq!(state.shake, 30.0);

        decay_shake(&mut state, &config);
        assert!((state.shake - 27.0).abs() < 1e-4);

        state.shake = 0.55;
        decay_shake(&mut state, &config);
        assert_eq!(state.shake, 0.0);
    }
}
