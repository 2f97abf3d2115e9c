//! The game core: one shared snapshot, three components, one timer queue.
//!
//! Field ownership follows the components. `matchup` is written by the
//! Match Controller (`controller.rs`), `enemy` by the Enemy Scheduler
//! (`enemy.rs`) and `player` by the Charge/Resolution Engine (`charge.rs`).
//! The two enemy overrides (Hit on a landed strike, CaughtYou on a loss)
//! are the only cross-component writes.
//!
//! Every delayed transition is queued as an [`Armed`] task stamped with the
//! episode it was armed under. A task from an older episode is discarded
//! when it fires.

use baguette_engine::{TimerId, TimerQueue};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::charge::ChargeEngine;
use crate::controller::MatchState;
use crate::cues::Cue;
use crate::enemy::{EnemyScheduler, EnemyStage};
use crate::state::{EnemyState, MatchPhase, PlayerAction, Snapshot};
use crate::tuning::Tuning;

/// Monotonic token naming the current episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Episode(pub u64);

impl Episode {
    pub fn next(self) -> Self {
        Episode(self.0 + 1)
    }
}

/// A delayed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scheduled {
    /// Next stage of the enemy cycle armed under `generation`.
    EnemyStage { generation: u64, stage: EnemyStage },
    /// Strike lands; `final_charge` was captured at release.
    Impact { final_charge: f32 },
    /// End of the Hit stun.
    StunRecovery,
    /// End of the swing animation.
    SwingReset,
    /// Delayed win after reaching the winning score.
    Victory,
}

/// A scheduled transition plus the episode it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Armed {
    pub episode: Episode,
    pub task: Scheduled,
}

pub struct Justice {
    pub(crate) tuning: Tuning,
    pub(crate) matchup: MatchState,
    pub(crate) enemy: EnemyScheduler,
    pub(crate) player: ChargeEngine,
    pub(crate) timers: TimerQueue<Armed>,
    pub(crate) cues: Vec<Cue>,
}

impl Justice {
    pub fn new(tuning: Tuning, rng: ChaCha8Rng) -> Self {
        Self {
            tuning,
            matchup: MatchState::new(),
            enemy: EnemyScheduler::new(rng),
            player: ChargeEngine::new(),
            timers: TimerQueue::new(),
            cues: Vec::new(),
        }
    }

    /// Deterministic core for tests and replays.
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::new(tuning, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> MatchPhase {
        self.matchup.phase
    }

    pub fn score(&self) -> u32 {
        self.matchup.score
    }

    pub fn episode(&self) -> Episode {
        self.matchup.episode
    }

    pub fn enemy_state(&self) -> EnemyState {
        self.enemy.state
    }

    pub fn player_action(&self) -> PlayerAction {
        self.player.action
    }

    pub fn charge_fraction(&self) -> f32 {
        self.player.fraction
    }

    /// Whether the charge tone is currently held.
    pub fn tone_active(&self) -> bool {
        self.player.tone.is_some()
    }

    /// Completed enemy cycles in the current episode.
    pub fn enemy_cycles(&self) -> u64 {
        self.enemy.cycles_completed
    }

    /// Number of transitions still queued, stale ones included.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.matchup.phase,
            score: self.matchup.score,
            winning_score: self.tuning.winning_score,
            enemy: self.enemy.state,
            player: self.player.action,
            charge_fraction: self.player.fraction,
        }
    }

    /// Take the cues announced since the last call.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Fire every transition due at or before `now_ms`, each at its own fire time.
    pub fn advance(&mut self, now_ms: f64) {
        while let Some((at, armed)) = self.timers.pop_due(now_ms) {
            self.fire(armed, at);
        }
    }

    pub(crate) fn schedule(&mut self, now_ms: f64, delay_ms: u32, task: Scheduled) -> TimerId {
        let armed = Armed {
            episode: self.matchup.episode,
            task,
        };
        self.timers.schedule(now_ms, f64::from(delay_ms), armed)
    }

    fn fire(&mut self, armed: Armed, at: f64) {
        if armed.episode != self.matchup.episode {
            log::debug!("discarding {:?} from superseded episode {}", armed.task, armed.episode.0);
            return;
        }
        match armed.task {
            Scheduled::EnemyStage { generation, stage } => self.fire_enemy_stage(generation, stage, at),
            Scheduled::Impact { final_charge } => self.resolve_impact(final_charge, at),
            Scheduled::StunRecovery => self.recover_from_stun(at),
            Scheduled::SwingReset => self.reset_swing(),
            Scheduled::Victory => self.enter_victory(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::harness::Bench;
    use super::*;

    #[test]
    fn fresh_core_sits_in_menu() {
        let core = Justice::with_seed(Tuning::default(), 1);
        let snapshot = core.snapshot();
        assert_eq!(snapshot.phase, MatchPhase::Menu);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.enemy, EnemyState::Working);
        assert_eq!(snapshot.player, PlayerAction::Idle);
        assert_eq!(snapshot.charge_fraction, 0.0);
        assert_eq!(core.pending_timers(), 0);
    }

    #[test]
    fn stale_swing_reset_does_not_touch_next_episode() {
        let mut bench = Bench::calm();
        bench.start();
        bench.press();
        bench.run_for(500.0);
        bench.release();
        // Caught between release and the swing reset.
        bench.core.fail();
        bench.core.select_retry(bench.now);
        bench.press();
        assert_eq!(bench.core.player_action(), PlayerAction::Charging);

        // The old impact and swing reset come due now and must be ignored.
        bench.run_for(400.0);
        assert_eq!(bench.core.phase(), MatchPhase::Playing);
        assert_eq!(bench.core.player_action(), PlayerAction::Charging);
        assert_eq!(bench.core.score(), 0);
    }

    #[test]
    fn same_seed_replays_identically() {
        let run = || {
            let mut bench = Bench::new(Tuning::default());
            bench.start();
            let mut states = Vec::new();
            for _ in 0..600 {
                bench.run_for(50.0);
                states.push(bench.core.enemy_state());
            }
            states
        };
        assert_eq!(run(), run());
    }
}
