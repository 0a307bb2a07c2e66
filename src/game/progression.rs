//! Wave and Level Progression
//!
//! Score thresholds advance the wave; every third wave is a new level.

use serde::{Serialize, Deserialize};

use crate::game::effects::{add_shake, emit_text, palette, EffectsConfig};
use crate::game::enemy::SpawnConfig;
use crate::game::events::{GameEvent, GameEventData, NarrativeSituation, SoundId};
use crate::game::state::{world_center, SimState};

/// Progression tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Wave advances once score exceeds `wave * wave_score_step`
    pub wave_score_step: u32,
    /// Level advances when the new wave is a multiple of this
    pub waves_per_level: u32,
    /// Health restored on each wave
    pub wave_heal: f32,
    /// Shake on each wave
    pub wave_shake: f32,
    /// Health below which the low-health line is requested
    pub low_health_threshold: f32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            wave_score_step: 300,
            waves_per_level: 3,
            wave_heal: 30.0,
            wave_shake: 10.0,
            low_health_threshold: 25.0,
        }
    }
}

/// Advance the wave if the score crossed its threshold.
///
/// At most one wave per call. Returns true if the wave advanced.
pub fn check_wave_progress(
    state: &mut SimState,
    config: &ProgressionConfig,
    spawn: &SpawnConfig,
    effects: &EffectsConfig,
) -> bool {
    let threshold = state.session.wave.saturating_mul(config.wave_score_step);
    if state.session.score <= threshold {
        return false;
    }

    state.session.wave += 1;
    let wave = state.session.wave;

    let leveled = config.waves_per_level > 0 && wave % config.waves_per_level == 0;
    if leveled {
        state.session.level += 1;
        state.play_sound(SoundId::Powerup);
    }

    state.session.spawn_rate = spawn.rate_for_wave(wave);
    state.player.heal(config.wave_heal);
    // Level changes reach the HUD immediately, not at the next sync
    if leveled {
        state.sync_hud();
    }
    emit_text(state, world_center(), "WAVE CLEARED", palette::COLLAR, false, effects);
    add_shake(state, config.wave_shake, effects);

    state.push_event(GameEvent::new(
        state.frame,
        GameEventData::WaveAdvanced {
            wave,
            level: state.session.level,
        },
    ));
    state.request_narrative(NarrativeSituation::WaveComplete);
    true
}

/// Request the low-health line once per dip below the threshold.
pub fn check_low_health(state: &mut SimState, config: &ProgressionConfig) {
    if state.player.health < config.low_health_threshold {
        if !state.session.low_health_warned {
            state.session.low_health_warned = true;
            state.request_narrative(NarrativeSituation::LowHealth);
        }
    } else {
        state.session.low_health_warned = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state() -> SimState {
        let mut state = SimState::new(77, 75.0);
        state.start_new_game();
        state.take_events();
        state
    }

    fn narrative_requests(state: &mut SimState) -> Vec<NarrativeSituation> {
        state
            .take_events()
            .iter()
            .filter_map(|e| e.as_narrative_request())
            .collect()
    }

    #[test]
    fn test_wave_requires_strictly_greater_score() {
        let mut state = playing_state();
        let config = ProgressionConfig::default();
        let spawn = SpawnConfig::default();
        let effects = EffectsConfig::default();

        state.session.score = 300;
        assert!(!check_wave_progress(&mut state, &config, &spawn, &effects));

        state.session.score = 310;
        assert!(check_wave_progress(&mut state, &config, &spawn, &effects));
        assert_eq!(state.session.wave, 2);
        assert_eq!(state.session.level, 1);
        assert_eq!(state.session.spawn_rate, 71.0);
        // Plain wave advances wait for the periodic HUD sync
        assert_eq!(state.session.hud.wave, 1);
        assert_eq!(narrative_requests(&mut state), vec![NarrativeSituation::WaveComplete]);
    }

    #[test]
    fn test_wave_once_per_threshold() {
        let mut state = playing_state();
        let config = ProgressionConfig::default();
        let spawn = SpawnConfig::default();
        let effects = EffectsConfig::default();

        // Score far past several thresholds still advances one wave per call
        state.session.score = 1000;
        for _ in 0..10 {
            check_wave_progress(&mut state, &config, &spawn, &effects);
        }
        // 1000 > 3*300, not > 4*300
        assert_eq!(state.session.wave, 4);
        assert_eq!(state.session.level, 2);
    }

    #[test]
    fn test_level_up_on_third_wave() {
        let mut state = playing_state();
        let config = ProgressionConfig::default();
        let spawn = SpawnConfig::default();
        let effects = EffectsConfig::default();

        state.session.wave = 2;
        state.session.score = 610;
        check_wave_progress(&mut state, &config, &spawn, &effects);
        assert_eq!(state.session.wave, 3);
        assert_eq!(state.session.level, 2);
        assert_eq!(state.session.hud.level, 2);
        assert_eq!(state.session.hud.wave, 3);
        assert!(state
            .take_events()
            .iter()
            .any(|e| e.as_sound() == Some(SoundId::Powerup)));
    }

    #[test]
    fn test_wave_heal_capped() {
        let mut state = playing_state();
        let config = ProgressionConfig::default();
        let spawn = SpawnConfig::default();
        let effects = EffectsConfig::default();

        state.player.health = 90.0;
        state.session.score = 301;
        check_wave_progress(&mut state, &config, &spawn, &effects);
        assert_eq!(state.player.health, 100.0);
        assert_eq!(state.shake, 10.0);
        assert!(state.floating_texts.iter().any(|t| t.text == "WAVE CLEARED"));
    }

    #[test]
    fn test_low_health_latch() {
        let mut state = playing_state();
        let config = ProgressionConfig::default();

        state.player.health = 24.0;
        check_low_health(&mut state, &config);
        check_low_health(&mut state, &config);
        assert_eq!(narrative_requests(&mut state), vec![NarrativeSituation::LowHealth]);

        state.player.health = 54.0;
        check_low_health(&mut state, &config);
        state.player.health = 10.0;
        check_low_health(&mut state, &config);
        assert_eq!(narrative_requests(&mut state), vec![NarrativeSituation::LowHealth]);
    }
}
