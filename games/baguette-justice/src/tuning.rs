//! Timing and damage constants.
//!
//! Values default to the shipped "hard mode" tuning. The game loads
//! `tuning.json` once at construction; a `Tuning` is read-only afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WINNING_SCORE: u32 = 100;
/// 3 seconds for full power.
pub const MAX_CHARGE_TIME_MS: u32 = 3000;
/// Weak normal hit.
pub const BASE_DAMAGE: u32 = 1;
/// Bonus for a full charge (total 50).
pub const MAX_BONUS_DAMAGE: u32 = 49;

// Enemy timings (ms)
pub const MIN_WORK_TIME_MS: u32 = 400;
pub const MAX_WORK_TIME_MS: u32 = 3000;
pub const ALERT_DURATION_MS: u32 = 200;
pub const WATCH_DURATION_MS: u32 = 2000;
pub const STUN_DURATION_MS: u32 = 800;

// Presentation delays (ms)
pub const IMPACT_DELAY_MS: u32 = 100;
pub const SWING_DURATION_MS: u32 = 300;
pub const VICTORY_DELAY_MS: u32 = 500;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Tuning file compiled into the game.
pub const SHIPPED_TUNING: &str = include_str!("../tuning.json");

/// Every number the match, enemy and charge logic depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    pub winning_score: u32,
    pub max_charge_time_ms: u32,
    pub base_damage: u32,
    pub max_bonus_damage: u32,
    pub min_work_time_ms: u32,
    pub max_work_time_ms: u32,
    pub alert_duration_ms: u32,
    pub watch_duration_ms: u32,
    pub stun_duration_ms: u32,
    pub impact_delay_ms: u32,
    pub swing_duration_ms: u32,
    pub victory_delay_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            winning_score: WINNING_SCORE,
            max_charge_time_ms: MAX_CHARGE_TIME_MS,
            base_damage: BASE_DAMAGE,
            max_bonus_damage: MAX_BONUS_DAMAGE,
            min_work_time_ms: MIN_WORK_TIME_MS,
            max_work_time_ms: MAX_WORK_TIME_MS,
            alert_duration_ms: ALERT_DURATION_MS,
            watch_duration_ms: WATCH_DURATION_MS,
            stun_duration_ms: STUN_DURATION_MS,
            impact_delay_ms: IMPACT_DELAY_MS,
            swing_duration_ms: SWING_DURATION_MS,
            victory_delay_ms: VICTORY_DELAY_MS,
        }
    }
}

impl Tuning {
    /// Parse a tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.winning_score == 0 {
            return Err(TuningError::Invalid("winningScore must be positive"));
        }
        if self.max_charge_time_ms == 0 {
            return Err(TuningError::Invalid("maxChargeTimeMs must be positive"));
        }
        // A zero-length work phase would re-arm the enemy at the same instant forever.
        if self.min_work_time_ms == 0 {
            return Err(TuningError::Invalid("minWorkTimeMs must be positive"));
        }
        if self.min_work_time_ms > self.max_work_time_ms {
            return Err(TuningError::Invalid("minWorkTimeMs exceeds maxWorkTimeMs"));
        }
        if self.swing_duration_ms < self.impact_delay_ms {
            return Err(TuningError::Invalid("swingDurationMs is shorter than impactDelayMs"));
        }
        if self.max_damage().is_none() {
            return Err(TuningError::Invalid("baseDamage + maxBonusDamage overflows"));
        }
        Ok(())
    }

    /// Highest damage a single strike can deal, `None` if it does not fit a `u32`.
    pub fn max_damage(&self) -> Option<u32> {
        self.base_damage.checked_add(self.max_bonus_damage)
    }
}
