//! Simulation Tick
//!
//! Advances one frame in a fixed order. Infallible: bad input is
//! sanitised upstream and numeric state is clamped where it is written.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::ability::{advance_melee, start_melee, tick_cooldowns, try_bomb, try_throw, AbilityConfig};
use crate::game::companion::{update_companion, CompanionConfig};
use crate::game::effects::{decay_shake, update_floating_texts, update_particles, EffectsConfig};
use crate::game::enemy::{maybe_spawn_enemy, prune_dead_enemies, update_enemies, EnemyConfig, SpawnConfig};
use crate::game::events::{GameEvent, GameEventData, NarrativeSituation, SoundId};
use crate::game::input::{InputFrame, Intent};
use crate::game::progression::{check_low_health, check_wave_progress, ProgressionConfig};
use crate::game::projectile::update_projectiles;
use crate::game::state::{Player, SessionPhase, SimState};
use crate::{PLAYER_MARGIN, WORLD_HEIGHT, WORLD_WIDTH};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Enemies removed this tick
    pub enemies_killed: u32,
    /// Whether the wave advanced this tick
    pub wave_advanced: bool,
    /// Whether the game ended this tick
    pub game_over: bool,
}

/// Configuration for the simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// Player speed (units/tick)
    pub player_speed: f32,
    /// HUD snapshot refreshes on frames divisible by this
    pub hud_sync_interval: u64,
    /// Player abilities
    pub abilities: AbilityConfig,
    /// Companion
    pub companion: CompanionConfig,
    /// Enemies
    pub enemy: EnemyConfig,
    /// Spawn cadence
    pub spawn: SpawnConfig,
    /// Waves and levels
    pub progression: ProgressionConfig,
    /// Particles, text, shake
    pub effects: EffectsConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player_speed: 5.0,
            hud_sync_interval: 10,
            abilities: AbilityConfig::default(),
            companion: CompanionConfig::default(),
            enemy: EnemyConfig::default(),
            spawn: SpawnConfig::default(),
            progression: ProgressionConfig::default(),
            effects: EffectsConfig::default(),
        }
    }
}

impl SimConfig {
    /// Create an idle state matching this configuration.
    pub fn new_state(&self, seed: u64) -> SimState {
        SimState::new(seed, self.spawn.initial_rate)
    }
}

/// Run one simulation tick.
///
/// Does nothing unless the session is `Playing`. Order:
/// input and abilities, effects, companion, enemies, pruning and score,
/// wave progression, spawning, projectiles, shake, end of game / HUD.
pub fn tick(state: &mut SimState, input: &InputFrame, config: &SimConfig) -> TickResult {
    let mut result = TickResult::default();

    if state.session.phase != SessionPhase::Playing {
        return result;
    }

    // 0. Advance frame counter
    state.frame += 1;

    // 1-2. Player input and abilities
    apply_input(state, &input.resolve(), config);

    // 3. Cosmetic effects
    update_particles(state, &config.effects);
    update_floating_texts(state);

    // 4. Companion
    update_companion(state, &config.companion, &config.effects);

    // 5. Enemy movement and contact damage
    update_enemies(state, &config.enemy, &config.effects);

    // 6. Remove dead enemies
    result.enemies_killed = prune_dead_enemies(state, &config.enemy, &config.effects);

    // 7. Wave / level
    result.wave_advanced = check_wave_progress(state, &config.progression, &config.spawn, &config.effects);

    // 8. Spawner
    maybe_spawn_enemy(state, &config.spawn, &config.enemy);

    // 9. Projectiles
    update_projectiles(state, &config.abilities, &config.effects);

    // 10. Camera shake
    decay_shake(state, &config.effects);

    // 11. End of game / HUD
    check_end_conditions(state, config, &mut result);

    #[cfg(feature = "debug-tracing")]
    tracing::trace!(
        frame = state.frame,
        enemies = state.enemies.len(),
        projectiles = state.projectiles.len(),
        particles = state.particles.len(),
        health = state.player.health,
        "tick"
    );

    result.events = state.take_events();
    result
}

/// Cooldowns, squat lock, then throw, bomb, movement and squat trigger.
fn apply_input(state: &mut SimState, intent: &Intent, config: &SimConfig) {
    state.player.last_position = state.player.position;
    state.player.velocity = Vec2::ZERO;
    tick_cooldowns(state);

    if advance_melee(state, &config.abilities, &config.effects) {
        return;
    }

    if intent.throw {
        try_throw(state, &config.abilities, &config.effects);
    }
    if intent.bomb {
        try_bomb(state, &config.abilities, &config.effects);
    }

    move_player(&mut state.player, intent.direction, config.player_speed);

    if intent.squat {
        start_melee(state, &config.abilities);
    }
}

/// Step the player along `direction`, keeping them inside the margin.
fn move_player(player: &mut Player, direction: Vec2, speed: f32) {
    if direction.is_zero() {
        return;
    }

    let min = Vec2::new(PLAYER_MARGIN, PLAYER_MARGIN);
    let max = Vec2::new(WORLD_WIDTH - PLAYER_MARGIN, WORLD_HEIGHT - PLAYER_MARGIN);
    player.position = (player.position + direction * speed).clamp(min, max);
    player.velocity = player.position - player.last_position;

    if direction.x != 0.0 {
        player.facing_right = direction.x > 0.0;
    }
}

/// Flip to game over on death, otherwise refresh the HUD on cadence.
fn check_end_conditions(state: &mut SimState, config: &SimConfig, result: &mut TickResult) {
    if state.player.is_dead() {
        state.session.phase = SessionPhase::GameOver;
        result.game_over = true;

        state.play_sound(SoundId::Explosion);
        state.sync_hud();
        state.push_event(GameEvent::new(
            state.frame,
            GameEventData::GameOver {
                score: state.session.score,
                wave: state.session.wave,
                frame: state.frame,
            },
        ));
        state.request_narrative(NarrativeSituation::GameOver);
        return;
    }

    check_low_health(state, &config.progression);

    if config.hud_sync_interval > 0 && state.frame % config.hud_sync_interval == 0 {
        state.sync_hud();
    }
}
