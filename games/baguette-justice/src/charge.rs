//! Charge/Resolution Engine: the charge gesture, danger sampling and strike outcome.

use crate::cues::{ChargeTone, Cue};
use crate::justice::{Justice, Scheduled};
use crate::state::{EnemyState, MatchPhase, PlayerAction};
use crate::tuning::Tuning;

#[derive(Debug)]
pub struct ChargeEngine {
    pub(crate) action: PlayerAction,
    /// Set exactly while `action` is Charging.
    pub(crate) started_ms: Option<f64>,
    pub(crate) fraction: f32,
    pub(crate) tone: Option<ChargeTone>,
}

impl ChargeEngine {
    pub fn new() -> Self {
        Self {
            action: PlayerAction::Idle,
            started_ms: None,
            fraction: 0.0,
            tone: None,
        }
    }

    /// Back to an idle arm. The tone must already be released.
    pub(crate) fn reset(&mut self) {
        debug_assert!(self.tone.is_none());
        self.action = PlayerAction::Idle;
        self.started_ms = None;
        self.fraction = 0.0;
    }
}

impl Default for ChargeEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Held time as a fraction of a full charge, clamped to [0, 1].
pub fn charge_fraction(elapsed_ms: f64, max_charge_time_ms: u32) -> f32 {
    if max_charge_time_ms == 0 {
        return 1.0;
    }
    (elapsed_ms / f64::from(max_charge_time_ms)).clamp(0.0, 1.0) as f32
}

/// `base + floor(fraction × bonus)`.
pub fn damage_for(fraction: f32, tuning: &Tuning) -> u32 {
    let bonus = f64::from(fraction.clamp(0.0, 1.0)) * f64::from(tuning.max_bonus_damage);
    tuning.base_damage.saturating_add(bonus.floor() as u32)
}

impl Justice {
    /// Press. Starts a charge, or loses on the spot if the enemy is looking.
    pub fn begin_charge(&mut self, now_ms: f64) -> bool {
        if self.player_locked_out() {
            log::debug!("press ignored ({:?}, {:?})", self.matchup.phase, self.player.action);
            return false;
        }
        if self.enemy.state.is_dangerous() {
            self.fail();
            return false;
        }
        self.player.action = PlayerAction::Charging;
        self.player.started_ms = Some(now_ms);
        self.player.fraction = 0.0;
        self.player.tone = Some(ChargeTone::start(&mut self.cues));
        true
    }

    /// Per-frame check while charging: refresh the fraction, lose if watched.
    pub fn sample_tick(&mut self, now_ms: f64) {
        if self.matchup.phase != MatchPhase::Playing || self.player.action != PlayerAction::Charging {
            return;
        }
        let Some(started) = self.player.started_ms else {
            return;
        };
        self.player.fraction = charge_fraction(now_ms - started, self.tuning.max_charge_time_ms);
        if self.enemy.state.is_dangerous() {
            // fail() releases the tone and stops further sampling.
            self.fail();
        }
    }

    /// Release. Locks the arm into a swing; the outcome is decided on impact.
    pub fn release_charge(&mut self, now_ms: f64) -> bool {
        if self.matchup.phase != MatchPhase::Playing || self.player.action != PlayerAction::Charging {
            return false;
        }
        let Some(started) = self.player.started_ms.take() else {
            return false;
        };
        let final_charge = charge_fraction(now_ms - started, self.tuning.max_charge_time_ms);
        self.player.fraction = final_charge;
        self.release_tone();
        self.player.action = PlayerAction::Swinging;

        self.schedule(now_ms, self.tuning.impact_delay_ms, Scheduled::Impact { final_charge });
        self.schedule(now_ms, self.tuning.swing_duration_ms, Scheduled::SwingReset);
        true
    }

    /// Danger is judged now, not at release.
    pub(crate) fn resolve_impact(&mut self, final_charge: f32, at: f64) {
        if self.matchup.phase != MatchPhase::Playing {
            return;
        }
        if self.enemy.state.is_dangerous() {
            self.fail();
            return;
        }
        let damage = damage_for(final_charge, &self.tuning);
        self.enemy.state = EnemyState::Hit;
        self.cues.push(Cue::Hit);
        log::debug!("hit for {} (charge {:.2})", damage, final_charge);
        if !self.award(damage, at) {
            self.schedule(at, self.tuning.stun_duration_ms, Scheduled::StunRecovery);
        }
    }

    pub(crate) fn recover_from_stun(&mut self, at: f64) {
        if self.matchup.phase != MatchPhase::Playing || self.matchup.victory_pending {
            return;
        }
        self.enemy.state = EnemyState::Working;
        self.arm_enemy(at);
    }

    pub(crate) fn reset_swing(&mut self) {
        if self.matchup.phase != MatchPhase::Playing || self.player.action != PlayerAction::Swinging {
            return;
        }
        self.player.reset();
    }

    /// Stop the charge tone if one is playing. Safe on every exit path.
    pub(crate) fn release_tone(&mut self) {
        if let Some(tone) = self.player.tone.take() {
            tone.stop(&mut self.cues);
        }
    }
}
