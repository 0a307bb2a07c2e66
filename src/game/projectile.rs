//! Projectiles
//!
//! Per-kind update for shockwave rings, boomerang dumbbells and bombs.
//! Durations tick down first; anything at zero afterwards is removed.

use crate::core::vec2::Vec2;
use crate::game::ability::AbilityConfig;
use crate::game::collision::{enemies_within, knockback};
use crate::game::effects::{add_shake, emit_particles, palette, EffectsConfig};
use crate::game::events::{GameEvent, GameEventData, SoundId};
use crate::game::state::{ProjectileKind, SimState};

/// Advance every projectile by one tick and drop the expired ones.
pub fn update_projectiles(state: &mut SimState, config: &AbilityConfig, effects: &EffectsConfig) {
    for idx in 0..state.projectiles.len() {
        let projectile = &mut state.projectiles[idx];
        projectile.duration = projectile.duration.saturating_sub(1);
        let kind = projectile.kind;

        match kind {
            ProjectileKind::Shockwave => {}
            ProjectileKind::Dumbbell { .. } => update_dumbbell(state, idx, config, effects),
            ProjectileKind::Bomb { radius } => {
                if projectile.duration <= 1 {
                    // Detonates once, then expires this tick
                    projectile.duration = 0;
                    let position = projectile.position;
                    detonate_bomb(state, position, radius, config, effects);
                }
            }
        }
    }

    state.projectiles.retain(|p| p.duration > 0);
}

fn update_dumbbell(state: &mut SimState, idx: usize, config: &AbilityConfig, effects: &EffectsConfig) {
    let player_pos = state.player.position;
    let (position, velocity) = {
        let p = &mut state.projectiles[idx];
        if let ProjectileKind::Dumbbell { rotation } = &mut p.kind {
            *rotation += config.throw_spin;
        }
        if p.duration < config.throw_return_after {
            p.velocity += p.position.direction_to(player_pos) * config.throw_return_accel;
            p.velocity = p.velocity * config.throw_return_damping;
        }
        p.position += p.velocity;
        (p.position, p.velocity)
    };

    let mut struck = Vec::new();
    for enemy in &mut state.enemies {
        if position.distance(enemy.position) < enemy.size {
            enemy.health -= config.throw_damage;
            struck.push(enemy.position);
            enemy.position += velocity * config.throw_push;
        }
    }
    for at in struck {
        emit_particles(state, at, palette::ZOMBIE_SKIN, 3, 1.0, effects);
    }
}

fn detonate_bomb(
    state: &mut SimState,
    center: Vec2,
    radius: f32,
    config: &AbilityConfig,
    effects: &EffectsConfig,
) {
    state.play_sound(SoundId::Explosion);
    add_shake(state, config.bomb_shake, effects);
    emit_particles(state, center, palette::BOMB, config.bomb_particles, 2.0, effects);

    let hit = enemies_within(&state.enemies, center, radius);
    for &i in &hit {
        let enemy = &mut state.enemies[i];
        enemy.health -= config.bomb_damage;
        enemy.position = knockback(enemy.position, center, config.bomb_knockback);
    }

    state.push_event(GameEvent::new(
        state.frame,
        GameEventData::BombExploded {
            position: center,
            hits: hit.len() as u32,
        },
    ));
}
