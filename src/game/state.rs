//! Game State Definitions
//!
//! All entity records and the owning `SimState`.
//! The tick is the only writer; presentation reads through `&SimState`
//! or a `FrameSnapshot`.

use serde::{Serialize, Deserialize};

use crate::core::rng::SimRng;
use crate::core::vec2::Vec2;
use crate::game::effects::palette;
use crate::game::events::{GameEvent, GameEventData, NarrativeSituation, SoundId};
use crate::{WORLD_HEIGHT, WORLD_WIDTH};

/// Player health at session start and the heal cap.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Horizontal offset of the companion from the player at session start.
pub const COMPANION_START_OFFSET: f32 = 50.0;

/// Narrative shown until the first generated line arrives.
pub const OPENING_NARRATIVE: &str = "Let's go, Valee. Time to burn.";

// =============================================================================
// COLOR
// =============================================================================

/// Packed `0xRRGGBB` color for effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

// =============================================================================
// ABILITY STATE MACHINES
// =============================================================================

/// Which ability an event or trigger refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AbilityKind {
    /// Squat shockwave
    Melee = 0,
    /// Boomerang dumbbell
    Throw = 1,
    /// Protein bomb
    Bomb = 2,
    /// Companion laser
    Laser = 3,
}

/// Re-use gate for an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cooldown {
    /// Usable now
    #[default]
    Ready,
    /// Counting down; usable once `remaining` reaches zero
    Cooling {
        /// Ticks left
        remaining: u32,
    },
}

impl Cooldown {
    /// Start cooling for `ticks` (a zero-length cooldown stays ready).
    pub fn start(ticks: u32) -> Self {
        if ticks == 0 {
            Cooldown::Ready
        } else {
            Cooldown::Cooling { remaining: ticks }
        }
    }

    /// Advance one tick.
    pub fn tick(&mut self) {
        *self = match *self {
            Cooldown::Cooling { remaining } if remaining > 1 => Cooldown::Cooling {
                remaining: remaining - 1,
            },
            _ => Cooldown::Ready,
        };
    }

    /// Check if the ability can fire.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Cooldown::Ready)
    }

    /// Ticks left before ready (0 when ready).
    #[inline]
    pub fn remaining(&self) -> u32 {
        match self {
            Cooldown::Ready => 0,
            Cooldown::Cooling { remaining } => *remaining,
        }
    }
}

/// Squat/shockwave state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeleeState {
    /// Free to move and act
    #[default]
    Idle,
    /// Squatting; input is locked until `remaining` hits zero
    Charging {
        /// Ticks left in the squat
        remaining: u32,
    },
}

// =============================================================================
// PLAYER
// =============================================================================

/// The player character.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Current position
    pub position: Vec2,
    /// Position at the start of the current tick
    pub last_position: Vec2,
    /// Movement applied this tick
    pub velocity: Vec2,
    /// Current health, always within [0, max_health]
    pub health: f32,
    /// Maximum health
    pub max_health: f32,
    /// Facing right (thrown weapons travel this way)
    pub facing_right: bool,
    /// Squat state
    pub melee: MeleeState,
    /// Dumbbell cooldown
    pub throw_cooldown: Cooldown,
    /// Bomb cooldown
    pub bomb_cooldown: Cooldown,
}

impl Player {
    /// Create a fresh player at `position`.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            last_position: position,
            velocity: Vec2::ZERO,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            facing_right: true,
            melee: MeleeState::Idle,
            throw_cooldown: Cooldown::Ready,
            bomb_cooldown: Cooldown::Ready,
        }
    }

    /// True while the squat locks input.
    #[inline]
    pub fn is_exercising(&self) -> bool {
        matches!(self.melee, MeleeState::Charging { .. })
    }

    /// True once health is exhausted.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Subtract health, clamping at zero.
    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    /// Add health, clamping at max.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    /// True if the position changed this tick.
    pub fn is_moving(&self) -> bool {
        !self.is_exercising()
            && ((self.position.x - self.last_position.x).abs() > 0.1
                || (self.position.y - self.last_position.y).abs() > 0.1)
    }
}

// =============================================================================
// COMPANION
// =============================================================================

/// The kitten that follows the player and fires a laser.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Companion {
    /// Current position
    pub position: Vec2,
    /// Laser cooldown
    pub laser_cooldown: Cooldown,
    /// Beam endpoint while the beam is visible
    pub beam_target: Option<Vec2>,
}

impl Companion {
    /// Create a companion at `position`.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            laser_cooldown: Cooldown::Ready,
            beam_target: None,
        }
    }
}

// =============================================================================
// ENEMIES
// =============================================================================

/// Unique enemy identifier (monotonic counter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyId(pub u32);

/// A zombie.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique ID
    pub id: EnemyId,
    /// Current position
    pub position: Vec2,
    /// Seek velocity from the last tick
    pub velocity: Vec2,
    /// Current health (may go negative before removal)
    pub health: f32,
    /// Health at spawn
    pub max_health: f32,
    /// Movement speed (units/tick)
    pub speed: f32,
    /// Phase offset for the idle wobble
    pub wobble_offset: f32,
    /// Collision size against thrown weapons
    pub size: f32,
}

impl Enemy {
    /// True once health is exhausted.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

// =============================================================================
// PROJECTILES
// =============================================================================

/// Kind-specific projectile payload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Expanding ring from the squat strike (visual only)
    Shockwave,
    /// Boomerang dumbbell
    Dumbbell {
        /// Spin angle in radians
        rotation: f32,
    },
    /// Protein bomb waiting on its fuse
    Bomb {
        /// Blast radius
        radius: f32,
    },
}

/// A projectile entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Projectile {
    /// Unique ID (monotonic counter)
    pub id: u32,
    /// Kind and payload
    pub kind: ProjectileKind,
    /// Current position
    pub position: Vec2,
    /// Current velocity
    pub velocity: Vec2,
    /// Ticks left before removal
    pub duration: u32,
}

// =============================================================================
// EFFECTS
// =============================================================================

/// A cosmetic particle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Particle {
    /// Current position
    pub position: Vec2,
    /// Current velocity
    pub velocity: Vec2,
    /// Remaining life in (0, 1]
    pub life: f32,
    /// Fill color
    pub color: Color,
    /// Radius
    pub size: f32,
    /// Spin angle
    pub rotation: f32,
    /// Spin per tick
    pub rotation_speed: f32,
}

/// Rising text ("CRUNCH", "PEW!", zombie quotes).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloatingText {
    /// Current position
    pub position: Vec2,
    /// Drift per tick
    pub velocity: Vec2,
    /// Ticks left
    pub life: u32,
    /// Text color
    pub color: Color,
    /// Derived from life each tick
    pub opacity: f32,
    /// The text
    pub text: String,
    /// Speech bubble style: slower fade, longer life
    pub is_dialogue: bool,
}

impl FloatingText {
    /// Opacity for the current life.
    pub fn opacity_for_life(life: u32, is_dialogue: bool) -> f32 {
        if is_dialogue {
            (life as f32 / 20.0).min(1.0)
        } else {
            life as f32 / 50.0
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Session lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Before the first game
    #[default]
    Idle,
    /// Ticking
    Playing,
    /// Player died; terminal until a new game
    GameOver,
}

/// Values the HUD displays, synced at a reduced cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Score
    pub score: u32,
    /// Wave
    pub wave: u32,
    /// Level
    pub level: u32,
    /// Health, floored
    pub health: u32,
}

/// Score, difficulty and narrative for the current run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    /// Accumulated score
    pub score: u32,
    /// Current wave (starts at 1)
    pub wave: u32,
    /// Current level (starts at 1, +1 every third wave)
    pub level: u32,
    /// Ticks between spawns
    pub spawn_rate: f32,
    /// Spawn rate restored on a new game
    pub initial_spawn_rate: f32,
    /// Lifecycle phase
    pub phase: SessionPhase,
    /// Latest narrator line
    pub narrative: String,
    /// Last values published to the HUD
    pub hud: HudSnapshot,
    /// Latched once the low-health line was requested
    pub low_health_warned: bool,
    /// Newest narrative request issued
    latest_narrative_request: Option<u64>,
    /// Newest narrative result applied
    latest_narrative_applied: Option<u64>,
}

impl GameSession {
    /// Create an idle session with the given starting spawn rate.
    pub fn new(initial_spawn_rate: f32) -> Self {
        Self {
            score: 0,
            wave: 1,
            level: 1,
            spawn_rate: initial_spawn_rate,
            initial_spawn_rate,
            phase: SessionPhase::Idle,
            narrative: String::new(),
            hud: HudSnapshot {
                score: 0,
                wave: 1,
                level: 1,
                health: PLAYER_MAX_HEALTH as u32,
            },
            low_health_warned: false,
            latest_narrative_request: None,
            latest_narrative_applied: None,
        }
    }

    /// True while ticking.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    /// True after the player died.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Background tint index for the current level.
    pub fn level_tint_index(&self) -> usize {
        (self.level.saturating_sub(1) % 5) as usize
    }

    /// Record that narrative request `seq` was dispatched.
    pub fn note_narrative_request(&mut self, seq: u64) {
        self.latest_narrative_request = Some(self.latest_narrative_request.map_or(seq, |s| s.max(seq)));
    }

    /// Apply a narrative result. The newest request wins: a result older
    /// than one already applied is dropped. Returns whether it was applied.
    pub fn apply_narrative(&mut self, seq: u64, text: String) -> bool {
        if self.latest_narrative_applied.is_some_and(|applied| seq < applied) {
            return false;
        }
        self.latest_narrative_applied = Some(seq);
        self.narrative = text;
        true
    }

    /// True while the newest request has not been answered.
    pub fn narrative_loading(&self) -> bool {
        match (self.latest_narrative_request, self.latest_narrative_applied) {
            (Some(requested), Some(applied)) => requested > applied,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

// =============================================================================
// SIM STATE
// =============================================================================

/// Complete simulation state, owned by the tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimState {
    /// Frames advanced in the current game
    pub frame: u64,
    /// Seed the RNG was created from
    pub rng_seed: u64,
    /// Random source
    #[serde(skip)]
    pub rng: SimRng,
    /// The player
    pub player: Player,
    /// The companion
    pub companion: Companion,
    /// Live enemies (unordered)
    pub enemies: Vec<Enemy>,
    /// Live projectiles
    pub projectiles: Vec<Projectile>,
    /// Live particles
    pub particles: Vec<Particle>,
    /// Live floating texts
    pub floating_texts: Vec<FloatingText>,
    /// Score / wave / narrative
    pub session: GameSession,
    /// Camera shake intensity
    pub shake: f32,
    /// Next enemy ID
    next_enemy_id: u32,
    /// Next projectile ID
    next_projectile_id: u32,
    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl SimState {
    /// Create an idle state. Call `start_new_game` to begin playing.
    pub fn new(rng_seed: u64, initial_spawn_rate: f32) -> Self {
        let center = world_center();
        Self {
            frame: 0,
            rng_seed,
            rng: SimRng::new(rng_seed),
            player: Player::new(center),
            companion: Companion::new(companion_start(center)),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            floating_texts: Vec::new(),
            session: GameSession::new(initial_spawn_rate),
            shake: 0.0,
            next_enemy_id: 0,
            next_projectile_id: 0,
            pending_events: Vec::new(),
        }
    }

    /// Reset everything and enter `Playing`.
    ///
    /// The RNG keeps its stream so consecutive games differ; narrative
    /// bookkeeping survives so late answers from the previous run lose to
    /// newer requests.
    pub fn start_new_game(&mut self) {
        let center = world_center();
        let spawn_rate = self.session.initial_spawn_rate;

        self.frame = 0;
        self.player = Player::new(center);
        self.companion = Companion::new(companion_start(center));
        self.enemies.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.floating_texts.clear();
        self.shake = 0.0;

        let session = &mut self.session;
        session.score = 0;
        session.wave = 1;
        session.level = 1;
        session.spawn_rate = spawn_rate;
        session.phase = SessionPhase::Playing;
        session.narrative = OPENING_NARRATIVE.to_string();
        session.low_health_warned = false;
        session.hud = HudSnapshot {
            score: 0,
            wave: 1,
            level: 1,
            health: self.player.health as u32,
        };

        self.push_event(GameEvent::sound(0, SoundId::Powerup));
        self.request_narrative(NarrativeSituation::Start);
    }

    /// Allocate a new enemy ID.
    pub fn next_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        id
    }

    /// Allocate a new projectile ID.
    pub fn next_projectile_id(&mut self) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        id
    }

    /// Get an enemy by ID.
    pub fn get_enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Get an enemy mutably by ID.
    pub fn get_enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Queue a narrative request for the outer runtime.
    pub fn request_narrative(&mut self, situation: NarrativeSituation) {
        let data = GameEventData::NarrativeRequested {
            situation,
            wave: self.session.wave,
            score: self.session.score,
        };
        self.push_event(GameEvent::new(self.frame, data));
    }

    /// Queue a sound for the outer runtime.
    pub fn play_sound(&mut self, sound: SoundId) {
        self.push_event(GameEvent::sound(self.frame, sound));
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Copy the HUD values from live state.
    pub fn sync_hud(&mut self) {
        self.session.hud = HudSnapshot {
            score: self.session.score,
            wave: self.session.wave,
            level: self.session.level,
            health: self.player.health.floor() as u32,
        };
    }

    /// Owned copy of everything presentation draws.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            phase: self.session.phase,
            hud: self.session.hud,
            narrative: self.session.narrative.clone(),
            narrative_loading: self.session.narrative_loading(),
            level_tint_index: self.session.level_tint_index(),
            background: palette::LEVEL_TINTS[self.session.level_tint_index() % palette::LEVEL_TINTS.len()],
            player_moving: self.player.is_moving(),
            shake: self.shake,
            player: self.player.clone(),
            companion: self.companion.clone(),
            enemies: self.enemies.clone(),
            projectiles: self.projectiles.clone(),
            particles: self.particles.clone(),
            floating_texts: self.floating_texts.clone(),
        }
    }
}

/// Centre of the world.
pub fn world_center() -> Vec2 {
    Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0)
}

fn companion_start(center: Vec2) -> Vec2 {
    Vec2::new(center.x - COMPANION_START_OFFSET, center.y)
}

/// Read-only view handed to presentation once per frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Frame number
    pub frame: u64,
    /// Session phase
    pub phase: SessionPhase,
    /// HUD values
    pub hud: HudSnapshot,
    /// Narrator line
    pub narrative: String,
    /// Narrator request outstanding
    pub narrative_loading: bool,
    /// Background tint index
    pub level_tint_index: usize,
    /// Background tint for the current level
    pub background: Color,
    /// Player walked this tick (drives the walk animation)
    pub player_moving: bool,
    /// Camera shake intensity
    pub shake: f32,
    /// Player
    pub player: Player,
    /// Companion
    pub companion: Companion,
    /// Enemies
    pub enemies: Vec<Enemy>,
    /// Projectiles
    pub projectiles: Vec<Projectile>,
    /// Particles
    pub particles: Vec<Particle>,
    /// Floating texts
    pub floating_texts: Vec<FloatingText>,
}
