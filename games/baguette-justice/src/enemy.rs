//! Enemy Scheduler: the randomized Working → Alert → Watching → Working loop.
//!
//! Only one stage is ever pending. Arming, restarting or halting bumps the
//! generation and cancels the pending stage, and a stage whose generation
//! no longer matches is dropped when it fires.

use baguette_engine::TimerId;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::cues::Cue;
use crate::justice::{Justice, Scheduled};
use crate::state::{EnemyState, MatchPhase};

/// The stage that fires next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyStage {
    /// Work time is over; start turning around.
    Alert,
    /// Fully turned around.
    Watch,
    /// Back to work.
    Work,
}

pub struct EnemyScheduler {
    pub(crate) state: EnemyState,
    pub(crate) cycles_completed: u64,
    rng: ChaCha8Rng,
    generation: u64,
    pending: Option<TimerId>,
}

impl EnemyScheduler {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self {
            state: EnemyState::Working,
            cycles_completed: 0,
            rng,
            generation: 0,
            pending: None,
        }
    }

    /// Uniform in [min, max] milliseconds.
    fn draw_work_time(&mut self, min_ms: u32, max_ms: u32) -> u32 {
        self.rng.gen_range(min_ms..=max_ms.max(min_ms))
    }
}

impl Justice {
    /// Start a new cycle: draw a work time and queue the Alert stage.
    /// Anything still in flight from an earlier cycle is discarded.
    pub(crate) fn arm_enemy(&mut self, now_ms: f64) {
        self.halt_enemy();
        let work_ms = self
            .enemy
            .draw_work_time(self.tuning.min_work_time_ms, self.tuning.max_work_time_ms);
        log::debug!("enemy working for {}ms", work_ms);
        self.queue_stage(now_ms, work_ms, EnemyStage::Alert);
    }

    /// Cancel the pending stage, if any.
    pub(crate) fn halt_enemy(&mut self) {
        self.enemy.generation += 1;
        if let Some(id) = self.enemy.pending.take() {
            self.timers.cancel(id);
        }
    }

    fn queue_stage(&mut self, now_ms: f64, delay_ms: u32, stage: EnemyStage) {
        let task = Scheduled::EnemyStage {
            generation: self.enemy.generation,
            stage,
        };
        self.enemy.pending = Some(self.schedule(now_ms, delay_ms, task));
    }

    pub(crate) fn fire_enemy_stage(&mut self, generation: u64, stage: EnemyStage, at: f64) {
        // Phase is re-checked at every stage: the episode may have ended mid-cycle.
        if self.matchup.phase != MatchPhase::Playing || generation != self.enemy.generation {
            log::debug!("dropping stale enemy stage {:?}", stage);
            return;
        }
        self.enemy.pending = None;
        match stage {
            EnemyStage::Alert => {
                self.enemy.state = EnemyState::Alert;
                self.cues.push(Cue::Alert);
                self.queue_stage(at, self.tuning.alert_duration_ms, EnemyStage::Watch);
            }
            EnemyStage::Watch => {
                self.enemy.state = EnemyState::Watching;
                self.queue_stage(at, self.tuning.watch_duration_ms, EnemyStage::Work);
            }
            EnemyStage::Work => {
                self.enemy.state = EnemyState::Working;
                self.enemy.cycles_completed += 1;
                self.arm_enemy(at);
            }
        }
        log::debug!("enemy -> {:?}", self.enemy.state);
    }
}
