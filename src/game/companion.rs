//! Companion
//!
//! The kitten orbits the player and lasers the nearest zombie on its own
//! cooldown, with no player input involved.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::collision::nearest_enemy;
use crate::game::effects::{add_shake, emit_particles, emit_text, palette, EffectsConfig};
use crate::game::events::{GameEvent, GameEventData, SoundId};
use crate::game::state::{AbilityKind, Cooldown, SimState};

/// Companion tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompanionConfig {
    /// Movement speed (units/tick)
    pub speed: f32,
    /// Laser cooldown
    pub laser_cooldown: u32,
    /// Beam stays on target for this many ticks after firing
    pub beam_ticks: u32,
    /// Detection range, measured from the companion
    pub laser_range: f32,
    /// Laser damage
    pub laser_damage: f32,
    /// Particles on hit
    pub laser_particles: u32,
    /// Shake on hit
    pub laser_shake: f32,
    /// Orbit angular speed (radians/frame)
    pub orbit_speed: f32,
    /// Orbit half-width
    pub orbit_radius_x: f32,
    /// Orbit half-height
    pub orbit_radius_y: f32,
    /// Companion stops when this close to its orbit point
    pub arrive_distance: f32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            speed: 4.5,
            laser_cooldown: 110,
            beam_ticks: 10,
            laser_range: 300.0,
            laser_damage: 70.0,
            laser_particles: 5,
            laser_shake: 4.0,
            orbit_speed: 0.05,
            orbit_radius_x: 60.0,
            orbit_radius_y: 20.0,
            arrive_distance: 5.0,
        }
    }
}

/// Fire (or hold) the laser, then move toward the orbit point.
pub fn update_companion(state: &mut SimState, config: &CompanionConfig, effects: &EffectsConfig) {
    update_laser(state, config, effects);
    follow_player(state, config);
}

fn update_laser(state: &mut SimState, config: &CompanionConfig, effects: &EffectsConfig) {
    let target = nearest_enemy(&state.enemies, state.companion.position);

    state.companion.beam_target = None;
    state.companion.laser_cooldown.tick();

    let Some((idx, dist)) = target else {
        return;
    };
    if dist >= config.laser_range {
        return;
    }

    let target_pos = state.enemies[idx].position;

    if state.companion.laser_cooldown.is_ready() {
        state.companion.laser_cooldown = Cooldown::start(config.laser_cooldown);
        state.companion.beam_target = Some(target_pos);
        state.enemies[idx].health -= config.laser_damage;
        let enemy_id = state.enemies[idx].id;

        emit_particles(state, target_pos, palette::LASER, config.laser_particles, 1.0, effects);
        emit_text(state, target_pos, "PEW!", palette::LASER, false, effects);
        state.play_sound(SoundId::Shoot);
        add_shake(state, config.laser_shake, effects);

        state.push_event(GameEvent::ability_used(state.frame, AbilityKind::Laser));
        state.push_event(GameEvent::new(
            state.frame,
            GameEventData::CompanionFired {
                enemy_id,
                damage: config.laser_damage,
            },
        ));
    } else if state.companion.laser_cooldown.remaining()
        > config.laser_cooldown.saturating_sub(config.beam_ticks)
    {
        state.companion.beam_target = Some(target_pos);
    }
}

/// Orbit point for the given frame.
pub fn orbit_point(player: Vec2, frame: u64, config: &CompanionConfig) -> Vec2 {
    let phase = frame as f32 * config.orbit_speed;
    Vec2::new(
        player.x + phase.cos() * config.orbit_radius_x,
        player.y + phase.sin() * config.orbit_radius_y,
    )
}

fn follow_player(state: &mut SimState, config: &CompanionConfig) {
    let target = orbit_point(state.player.position, state.frame, config);
    let position = state.companion.position;
    if position.distance(target) > config.arrive_distance {
        state.companion.position = position + position.direction_to(target) * config.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Enemy, EnemyId};

    fn playing_state() -> SimState {
        let mut state = SimState::new(99, 75.0);
        state.start_new_game();
        state.take_events();
        state
    }

    fn add_enemy(state: &mut SimState, position: Vec2) -> EnemyId {
        let id = state.next_enemy_id();
        state.enemies.push(Enemy {
            id,
            position,
            velocity: Vec2::ZERO,
            health: 200.0,
            max_health: 200.0,
            speed: 1.4,
            wobble_offset: 0.0,
            size: 42.0,
        });
        id
    }

    #[test]
    fn test_fires_at_nearest_in_range() {
        let mut state = playing_state();
        let config = CompanionConfig::default();
        let effects = EffectsConfig::default();
        let origin = state.companion.position;
        let far = add_enemy(&mut state, origin + Vec2::new(250.0, 0.0));
        let near = add_enemy(&mut state, origin + Vec2::new(0.0, 100.0));

        update_companion(&mut state, &config, &effects);

        assert_eq!(state.get_enemy(near).unwrap().health, 130.0);
        assert_eq!(state.get_enemy(far).unwrap().health, 200.0);
        assert_eq!(state.companion.beam_target, Some(origin + Vec2::new(0.0, 100.0)));
        assert_eq!(state.companion.laser_cooldown.remaining(), 110);
        assert!(state.take_events().iter().any(|e| e.as_sound() == Some(SoundId::Shoot)));
    }

    #[test]
    fn test_out_of_range_holds_fire() {
        let mut state = playing_state();
        let config = CompanionConfig::default();
        let effects = EffectsConfig::default();
        let origin = state.companion.position;
        let id = add_enemy(&mut state, origin + Vec2::new(300.0, 0.0));

        update_companion(&mut state, &config, &effects);
        assert_eq!(state.get_enemy(id).unwrap().health, 200.0);
        assert!(state.companion.beam_target.is_none());
        assert!(state.companion.laser_cooldown.is_ready());
    }

    #[test]
    fn test_beam_window_then_cooldown() {
        let mut state = playing_state();
        let config = CompanionConfig::default();
        let effects = EffectsConfig::default();
        let origin = state.companion.position;
        let id = add_enemy(&mut state, origin + Vec2::new(50.0, 0.0));

        // Keep the companion still so range stays constant
        let fire = |state: &mut SimState| {
            state.companion.position = origin;
            update_laser(state, &config, &effects);
        };

        fire(&mut state);
        assert_eq!(state.get_enemy(id).unwrap().health, 130.0);

        // Beam holds for the next 9 ticks without damage
        for _ in 0..9 {
            fire(&mut state);
            assert!(state.companion.beam_target.is_some());
        }
        fire(&mut state);
        assert!(state.companion.beam_target.is_none());
        assert_eq!(state.get_enemy(id).unwrap().health, 130.0);

        // Fires again once the full cooldown has elapsed
        for _ in 0..99 {
            fire(&mut state);
        }
        assert_eq!(state.get_enemy(id).unwrap().health, 130.0);
        fire(&mut state);
        assert_eq!(state.get_enemy(id).unwrap().health, 60.0);
    }

    #[test]
    fn test_follows_orbit_point() {
        let mut state = playing_state();
        let config = CompanionConfig::default();
        state.frame = 0;
        state.companion.position = state.player.position + Vec2::new(-200.0, 0.0);
        let before = state.companion.position;

        follow_player(&mut state, &config);
        assert!((state.companion.position.distance(before) - 4.5).abs() < 1e-4);

        // Already at the orbit point: stays put
        let target = orbit_point(state.player.position, state.frame, &config);
        state.companion.position = target + Vec2::new(3.0, 0.0);
        follow_player(&mut state, &config);
        assert_eq!(state.companion.position, target + Vec2::new(3.0, 0.0));
    }
}
