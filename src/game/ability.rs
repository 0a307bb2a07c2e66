//! Player Abilities
//!
//! Squat shockwave, boomerang dumbbell and protein bomb. Each ability is
//! gated by its own state machine and never fires twice on one trigger.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::collision::{enemies_within, knockback};
use crate::game::effects::{add_shake, emit_particles, emit_text, palette, EffectsConfig};
use crate::game::events::{GameEvent, GameEventData, SoundId};
use crate::game::state::{AbilityKind, Cooldown, MeleeState, Projectile, ProjectileKind, SimState};

/// Ability tuning (durations in ticks at 60Hz).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbilityConfig {
    /// Total squat length
    pub melee_duration: u32,
    /// Ticks into the squat when the strike lands
    pub melee_strike_delay: u32,
    /// Strike radius around the player
    pub melee_radius: f32,
    /// Strike damage
    pub melee_damage: f32,
    /// Distance enemies are pushed by the strike
    pub melee_knockback: f32,
    /// Shake on strike
    pub melee_shake: f32,
    /// Extra shake per enemy the strike kills
    pub melee_kill_shake: f32,
    /// Lifetime of the shockwave ring
    pub shockwave_duration: u32,

    /// Dumbbell cooldown
    pub throw_cooldown: u32,
    /// Dumbbell launch speed
    pub throw_speed: f32,
    /// Dumbbell spawns this far above the player
    pub throw_height: f32,
    /// Dumbbell lifetime
    pub throw_duration: u32,
    /// Dumbbell starts homing when its duration drops below this
    pub throw_return_after: u32,
    /// Homing acceleration toward the player
    pub throw_return_accel: f32,
    /// Velocity damping while homing
    pub throw_return_damping: f32,
    /// Dumbbell spin per tick
    pub throw_spin: f32,
    /// Dumbbell damage per tick of contact
    pub throw_damage: f32,
    /// Share of dumbbell velocity transferred to a struck enemy
    pub throw_push: f32,

    /// Bomb cooldown
    pub bomb_cooldown: u32,
    /// Ticks from placement to detonation
    pub bomb_fuse: u32,
    /// Blast radius
    pub bomb_radius: f32,
    /// Blast damage
    pub bomb_damage: f32,
    /// Blast knockback
    pub bomb_knockback: f32,
    /// Shake on detonation
    pub bomb_shake: f32,
    /// Particles on detonation
    pub bomb_particles: u32,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            melee_duration: 30,
            melee_strike_delay: 10,
            melee_radius: 180.0,
            melee_damage: 50.0,
            melee_knockback: 80.0,
            melee_shake: 8.0,
            melee_kill_shake: 2.0,
            shockwave_duration: 15,

            throw_cooldown: 45,
            throw_speed: 14.0,
            throw_height: 20.0,
            throw_duration: 60,
            throw_return_after: 30,
            throw_return_accel: 2.5,
            throw_return_damping: 0.85,
            throw_spin: 0.4,
            throw_damage: 40.0,
            throw_push: 0.5,

            bomb_cooldown: 300,
            bomb_fuse: 60,
            bomb_radius: 250.0,
            bomb_damage: 200.0,
            bomb_knockback: 150.0,
            bomb_shake: 15.0,
            bomb_particles: 30,
        }
    }
}

// =============================================================================
// COOLDOWNS
// =============================================================================

/// Decrement the throw and bomb cooldowns (runs every tick, even mid-squat).
pub fn tick_cooldowns(state: &mut SimState) {
    state.player.throw_cooldown.tick();
    state.player.bomb_cooldown.tick();
}

// =============================================================================
// MELEE
// =============================================================================

/// Begin the squat. Ignored if already charging.
pub fn start_melee(state: &mut SimState, config: &AbilityConfig) -> bool {
    if state.player.is_exercising() || config.melee_duration == 0 {
        return false;
    }
    state.player.melee = MeleeState::Charging {
        remaining: config.melee_duration,
    };
    state.push_event(GameEvent::ability_used(state.frame, AbilityKind::Melee));
    true
}

/// Advance a charging squat by one tick, landing the strike at its midpoint.
///
/// Returns true if the player was charging (input is locked this tick).
pub fn advance_melee(state: &mut SimState, config: &AbilityConfig, effects: &EffectsConfig) -> bool {
    let remaining = match state.player.melee {
        MeleeState::Idle => return false,
        MeleeState::Charging { remaining } => remaining.saturating_sub(1),
    };

    state.player.melee = if remaining == 0 {
        MeleeState::Idle
    } else {
        MeleeState::Charging { remaining }
    };

    if remaining == config.melee_duration.saturating_sub(config.melee_strike_delay) {
        melee_strike(state, config, effects);
    }

    true
}

/// Resolve the shockwave around the player.
fn melee_strike(state: &mut SimState, config: &AbilityConfig, effects: &EffectsConfig) {
    let center = state.player.position;

    add_shake(state, config.melee_shake, effects);
    state.play_sound(SoundId::Hit);
    let id = state.next_projectile_id();
    state.projectiles.push(Projectile {
        id,
        kind: ProjectileKind::Shockwave,
        position: center,
        velocity: Vec2::ZERO,
        duration: config.shockwave_duration,
    });

    let hit = enemies_within(&state.enemies, center, config.melee_radius);
    for &idx in &hit {
        let (position, killed) = {
            let enemy = &mut state.enemies[idx];
            enemy.health -= config.melee_damage;
            enemy.position = knockback(enemy.position, center, config.melee_knockback);
            (enemy.position, enemy.is_dead())
        };
        emit_particles(state, position, palette::ZOMBIE_SKIN, effects.hit_particles, 1.0, effects);
        emit_text(state, position, "CRUNCH", palette::WHITE, false, effects);
        if killed {
            add_shake(state, config.melee_kill_shake, effects);
        }
    }

    state.push_event(GameEvent::new(
        state.frame,
        GameEventData::MeleeStrike { hits: hit.len() as u32 },
    ));
}

// =============================================================================
// THROW
// =============================================================================

/// Throw a dumbbell in the facing direction if the cooldown allows.
pub fn try_throw(state: &mut SimState, config: &AbilityConfig, effects: &EffectsConfig) -> bool {
    if !state.player.throw_cooldown.is_ready() {
        return false;
    }
    state.player.throw_cooldown = Cooldown::start(config.throw_cooldown);

    let origin = state.player.position;
    let dir = if state.player.facing_right { Vec2::RIGHT } else { Vec2::LEFT };
    let id = state.next_projectile_id();
    state.projectiles.push(Projectile {
        id,
        kind: ProjectileKind::Dumbbell { rotation: 0.0 },
        position: Vec2::new(origin.x, origin.y - config.throw_height),
        velocity: dir * config.throw_speed,
        duration: config.throw_duration,
    });

    emit_text(state, Vec2::new(origin.x, origin.y - 40.0), "YEET!", palette::DUMBBELL, false, effects);
    state.play_sound(SoundId::Yeet);
    state.push_event(GameEvent::ability_used(state.frame, AbilityKind::Throw));
    true
}

// =============================================================================
// BOMB
// =============================================================================

/// Place a bomb at the player's feet if the cooldown allows.
pub fn try_bomb(state: &mut SimState, config: &AbilityConfig, effects: &EffectsConfig) -> bool {
    if !state.player.bomb_cooldown.is_ready() {
        return false;
    }
    state.player.bomb_cooldown = Cooldown::start(config.bomb_cooldown);

    let origin = state.player.position;
    let id = state.next_projectile_id();
    state.projectiles.push(Projectile {
        id,
        kind: ProjectileKind::Bomb { radius: config.bomb_radius },
        position: origin,
        velocity: Vec2::ZERO,
        duration: config.bomb_fuse,
    });

    emit_text(state, Vec2::new(origin.x, origin.y - 50.0), "PROTEIN BOMB!", palette::BOMB, false, effects);
    state.play_sound(SoundId::Powerup);
    state.push_event(GameEvent::ability_used(state.frame, AbilityKind::Bomb));
    true
}
