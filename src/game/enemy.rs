//! Enemy AI and Spawner
//!
//! Zombies walk straight at the player, chip health on contact and enter
//! from just outside a random world edge on a wave-scaled cadence.

use serde::{Serialize, Deserialize};

use crate::core::rng::SimRng;
use crate::core::vec2::Vec2;
use crate::game::effects::{add_shake, emit_particles, emit_text, palette, EffectsConfig, ZOMBIE_QUOTES};
use crate::game::events::{GameEvent, GameEventData, SoundId};
use crate::game::state::{Enemy, EnemyId, SimState};
use crate::{WORLD_HEIGHT, WORLD_WIDTH};

/// Enemy tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Speed at wave 0 (units/tick)
    pub base_speed: f32,
    /// Fractional speed bonus per wave
    pub speed_per_wave: f32,
    /// Health at wave 0
    pub base_health: f32,
    /// Extra health per wave
    pub health_per_wave: f32,
    /// Collision size against thrown weapons
    pub size: f32,
    /// Distance under which an enemy touches the player
    pub contact_radius: f32,
    /// Player damage per tick of contact
    pub contact_damage: f32,
    /// Contact feedback plays on frames divisible by this
    pub contact_feedback_interval: u64,
    /// Shake per contact feedback
    pub contact_shake: f32,
    /// Particles per contact feedback
    pub contact_particles: u32,
    /// Score per kill
    pub kill_score: u32,
    /// Chance a dying enemy says a quote
    pub dialogue_chance: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            base_speed: 1.4,
            speed_per_wave: 0.05,
            base_health: 30.0,
            health_per_wave: 10.0,
            size: 42.0,
            contact_radius: 35.0,
            contact_damage: 0.6,
            contact_feedback_interval: 20,
            contact_shake: 5.0,
            contact_particles: 3,
            kill_score: 10,
            dialogue_chance: 0.15,
        }
    }
}

impl EnemyConfig {
    /// Health of an enemy spawned during `wave`.
    pub fn health_for_wave(&self, wave: u32) -> f32 {
        self.base_health + self.health_per_wave * wave as f32
    }

    /// Speed of an enemy spawned during `wave`.
    pub fn speed_for_wave(&self, wave: u32) -> f32 {
        self.base_speed * (1.0 + self.speed_per_wave * wave as f32)
    }
}

/// Spawn cadence tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Ticks between spawns at the start of a game
    pub initial_rate: f32,
    /// Rate reduction per wave
    pub rate_step: f32,
    /// Fastest allowed rate
    pub min_rate: f32,
    /// Distance outside the world edge where enemies appear
    pub edge_offset: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_rate: 75.0,
            rate_step: 2.0,
            min_rate: 30.0,
            edge_offset: 80.0,
        }
    }
}

impl SpawnConfig {
    /// Spawn rate once `wave` is reached.
    pub fn rate_for_wave(&self, wave: u32) -> f32 {
        (self.initial_rate - self.rate_step * wave as f32).max(self.min_rate)
    }
}

/// World edge an enemy enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnEdge {
    /// Above the world
    Top,
    /// Right of the world
    Right,
    /// Below the world
    Bottom,
    /// Left of the world
    Left,
}

impl SpawnEdge {
    /// Pick an edge uniformly.
    pub fn random(rng: &mut SimRng) -> Self {
        match rng.next_int(4) {
            0 => SpawnEdge::Top,
            1 => SpawnEdge::Right,
            2 => SpawnEdge::Bottom,
            _ => SpawnEdge::Left,
        }
    }

    /// Uniform point along this edge, `offset` outside the world.
    pub fn point(self, rng: &mut SimRng, offset: f32) -> Vec2 {
        match self {
            SpawnEdge::Top => Vec2::new(rng.next_f32() * WORLD_WIDTH, -offset),
            SpawnEdge::Right => Vec2::new(WORLD_WIDTH + offset, rng.next_f32() * WORLD_HEIGHT),
            SpawnEdge::Bottom => Vec2::new(rng.next_f32() * WORLD_WIDTH, WORLD_HEIGHT + offset),
            SpawnEdge::Left => Vec2::new(-offset, rng.next_f32() * WORLD_HEIGHT),
        }
    }
}

// =============================================================================
// SPAWNING
// =============================================================================

/// Add an enemy at `position`, scaled to the current wave.
pub fn spawn_enemy_at(state: &mut SimState, position: Vec2, config: &EnemyConfig) -> EnemyId {
    let wave = state.session.wave;
    let health = config.health_for_wave(wave);
    let id = state.next_enemy_id();
    let wobble_offset = state.rng.next_angle();

    state.enemies.push(Enemy {
        id,
        position,
        velocity: Vec2::ZERO,
        health,
        max_health: health,
        speed: config.speed_for_wave(wave),
        wobble_offset,
        size: config.size,
    });
    state.push_event(GameEvent::new(
        state.frame,
        GameEventData::EnemySpawned { enemy_id: id, position },
    ));
    id
}

/// Spawn one enemy at a random edge if this frame is on the cadence.
pub fn maybe_spawn_enemy(state: &mut SimState, spawn: &SpawnConfig, config: &EnemyConfig) -> Option<EnemyId> {
    let interval = (state.session.spawn_rate.floor() as u64).max(1);
    if state.frame % interval != 0 {
        return None;
    }

    let edge = SpawnEdge::random(&mut state.rng);
    let position = edge.point(&mut state.rng, spawn.edge_offset);
    Some(spawn_enemy_at(state, position, config))
}

// =============================================================================
// MOVEMENT & CONTACT
// =============================================================================

/// Move every enemy toward the player and apply contact damage.
pub fn update_enemies(state: &mut SimState, config: &EnemyConfig, effects: &EffectsConfig) {
    let target = state.player.position;
    let feedback_frame = config.contact_feedback_interval > 0
        && state.frame % config.contact_feedback_interval == 0;
    let mut contacts = 0u32;

    for enemy in &mut state.enemies {
        enemy.velocity = enemy.position.direction_to(target) * enemy.speed;
        enemy.position += enemy.velocity;

        if enemy.position.distance(target) < config.contact_radius {
            contacts += 1;
        }
    }

    for _ in 0..contacts {
        state.player.apply_damage(config.contact_damage);
        if feedback_frame {
            add_shake(state, config.contact_shake, effects);
            state.play_sound(SoundId::Hit);
            emit_particles(state, target, palette::SHIRT, config.contact_particles, 1.0, effects);
        }
    }
}

/// Remove dead enemies and award score. Returns how many died.
pub fn prune_dead_enemies(state: &mut SimState, config: &EnemyConfig, effects: &EffectsConfig) -> u32 {
    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
        std::mem::take(&mut state.enemies).into_iter().partition(Enemy::is_dead);
    state.enemies = alive;

    for enemy in &dead {
        emit_particles(state, enemy.position, palette::ZOMBIE_SKIN, effects.death_particles, 1.0, effects);
        if state.rng.chance(config.dialogue_chance) {
            if let Some(&quote) = state.rng.choose(&ZOMBIE_QUOTES) {
                emit_text(state, enemy.position, quote, palette::DIALOGUE, true, effects);
            }
        }
        state.push_event(GameEvent::enemy_killed(state.frame, enemy.id, enemy.position));
    }

    let killed = dead.len() as u32;
    state.session.score += killed * config.kill_score;
    killed
}
