//! Game Events
//!
//! Side effects the tick hands to the outer runtime: sounds to play,
//! narrative to request, and gameplay notifications for logs and tests.
//! Events are kept in emission order.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::state::{AbilityKind, EnemyId};

/// Sound cues the presentation layer knows how to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    /// Companion laser
    Shoot,
    /// Jump (reserved, no trigger in the sim)
    Jump,
    /// Player takes contact damage
    Hit,
    /// Bomb blast and game over
    Explosion,
    /// Bomb placed, level up, new game
    Powerup,
    /// Dumbbell thrown
    Yeet,
}

impl SoundId {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            SoundId::Shoot => "shoot",
            SoundId::Jump => "jump",
            SoundId::Hit => "hit",
            SoundId::Explosion => "explosion",
            SoundId::Powerup => "powerup",
            SoundId::Yeet => "yeet",
        }
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moments that ask the narrator for a new line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSituation {
    /// New game began
    Start,
    /// Wave threshold crossed
    WaveComplete,
    /// Player died
    GameOver,
    /// Health dropped low
    LowHealth,
}

impl NarrativeSituation {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            NarrativeSituation::Start => "start",
            NarrativeSituation::WaveComplete => "wave_complete",
            NarrativeSituation::GameOver => "game_over",
            NarrativeSituation::LowHealth => "low_health",
        }
    }
}

impl fmt::Display for NarrativeSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Play a sound
    Sound {
        sound: SoundId,
    },

    /// Ask the narrator for a line
    NarrativeRequested {
        situation: NarrativeSituation,
        wave: u32,
        score: u32,
    },

    /// An ability fired
    AbilityUsed {
        ability: AbilityKind,
    },

    /// The squat strike resolved
    MeleeStrike {
        hits: u32,
    },

    /// Enemy entered from an edge
    EnemySpawned {
        enemy_id: EnemyId,
        position: Vec2,
    },

    /// Enemy removed after reaching zero health
    EnemyKilled {
        enemy_id: EnemyId,
        position: Vec2,
    },

    /// Companion laser hit an enemy
    CompanionFired {
        enemy_id: EnemyId,
        damage: f32,
    },

    /// A bomb detonated
    BombExploded {
        position: Vec2,
        hits: u32,
    },

    /// Score crossed the wave threshold
    WaveAdvanced {
        wave: u32,
        level: u32,
    },

    /// Player health reached zero
    GameOver {
        score: u32,
        wave: u32,
        frame: u64,
    },
}

/// A game event stamped with the frame it happened on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Frame when event occurred
    pub frame: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(frame: u64, data: GameEventData) -> Self {
        Self { frame, data }
    }

    /// Create a sound event.
    pub fn sound(frame: u64, sound: SoundId) -> Self {
        Self::new(frame, GameEventData::Sound { sound })
    }

    /// Create an ability-used event.
    pub fn ability_used(frame: u64, ability: AbilityKind) -> Self {
        Self::new(frame, GameEventData::AbilityUsed { ability })
    }

    /// Create an enemy-killed event.
    pub fn enemy_killed(frame: u64, enemy_id: EnemyId, position: Vec2) -> Self {
        Self::new(frame, GameEventData::EnemyKilled { enemy_id, position })
    }

    /// The sound carried by this event, if any.
    pub fn as_sound(&self) -> Option<SoundId> {
        match self.data {
            GameEventData::Sound { sound } => Some(sound),
            _ => None,
        }
    }

    /// The narrative situation carried by this event, if any.
    pub fn as_narrative_request(&self) -> Option<NarrativeSituation> {
        match self.data {
            GameEventData::NarrativeRequested { situation, .. } => Some(situation),
            _ => None,
        }
    }
}
