//! Match Controller: phase, score and the episode token.

use crate::cues::Cue;
use crate::justice::{Episode, Justice, Scheduled};
use crate::state::{EnemyState, MatchPhase, PlayerAction};

#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub phase: MatchPhase,
    pub score: u32,
    pub episode: Episode,
    /// Winning score reached, Victory transition queued.
    pub victory_pending: bool,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            phase: MatchPhase::Menu,
            score: 0,
            episode: Episode(0),
            victory_pending: false,
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl Justice {
    /// Begin a fresh Playing episode from Menu, GameOver or Victory.
    pub fn start_episode(&mut self, now_ms: f64) -> bool {
        if self.matchup.phase == MatchPhase::Playing {
            log::debug!("start_episode ignored: already playing");
            return false;
        }
        self.supersede_episode();
        self.matchup.phase = MatchPhase::Playing;
        self.matchup.score = 0;
        self.matchup.victory_pending = false;
        self.enemy.state = EnemyState::Working;
        self.enemy.cycles_completed = 0;
        self.release_tone();
        self.player.reset();
        self.arm_enemy(now_ms);
        log::info!("episode {} started", self.matchup.episode.0);
        true
    }

    /// Add `damage` to the score, clamped at the winning score.
    ///
    /// Returns true when this award reached the winning score. The enemy is
    /// halted and further charges are refused right away; the Victory phase
    /// itself follows after the presentation delay.
    pub fn award(&mut self, damage: u32, now_ms: f64) -> bool {
        if self.matchup.phase != MatchPhase::Playing {
            return false;
        }
        let winning = self.tuning.winning_score;
        self.matchup.score = self.matchup.score.saturating_add(damage).min(winning);
        if self.matchup.score < winning || self.matchup.victory_pending {
            return false;
        }
        self.matchup.victory_pending = true;
        self.halt_enemy();
        self.schedule(now_ms, self.tuning.victory_delay_ms, Scheduled::Victory);
        log::info!("winning score reached, victory in {}ms", self.tuning.victory_delay_ms);
        true
    }

    /// The player was seen. Ends the episode as GameOver.
    pub fn fail(&mut self) {
        if self.matchup.phase != MatchPhase::Playing {
            return;
        }
        if self.matchup.victory_pending {
            log::debug!("fail ignored: victory already secured");
            return;
        }
        self.matchup.phase = MatchPhase::GameOver;
        self.enemy.state = EnemyState::CaughtYou;
        self.halt_enemy();
        self.release_tone();
        self.player.reset();
        self.cues.push(Cue::Lose);
        self.supersede_episode();
        log::info!("caught! game over with score {}", self.matchup.score);
    }

    /// Leave a finished episode for the menu.
    pub fn return_to_menu(&mut self) -> bool {
        if !matches!(self.matchup.phase, MatchPhase::GameOver | MatchPhase::Victory) {
            log::debug!("return_to_menu ignored in {:?}", self.matchup.phase);
            return false;
        }
        self.halt_enemy();
        self.release_tone();
        self.matchup.phase = MatchPhase::Menu;
        self.supersede_episode();
        true
    }

    pub(crate) fn enter_victory(&mut self) {
        if self.matchup.phase != MatchPhase::Playing || !self.matchup.victory_pending {
            return;
        }
        self.matchup.phase = MatchPhase::Victory;
        self.matchup.victory_pending = false;
        self.release_tone();
        self.cues.push(Cue::Win);
        self.supersede_episode();
        log::info!("justice served");
    }

    /// Every transition armed so far becomes stale.
    fn supersede_episode(&mut self) {
        self.matchup.episode = self.matchup.episode.next();
    }

    // -- Menu selections --

    pub fn select_menu_start(&mut self, now_ms: f64) -> bool {
        self.click_then_start(now_ms)
    }

    pub fn select_retry(&mut self, now_ms: f64) -> bool {
        self.click_then_start(now_ms)
    }

    pub fn select_menu_return(&mut self) -> bool {
        self.return_to_menu()
    }

    /// "Play again" on the victory screen leads back to the menu.
    pub fn select_play_again(&mut self) -> bool {
        if self.matchup.phase != MatchPhase::Victory {
            return false;
        }
        self.cues.push(Cue::Click);
        self.return_to_menu()
    }

    fn click_then_start(&mut self, now_ms: f64) -> bool {
        if self.matchup.phase == MatchPhase::Playing {
            return false;
        }
        self.cues.push(Cue::Click);
        self.start_episode(now_ms)
    }

    pub(crate) fn player_locked_out(&self) -> bool {
        self.matchup.phase != MatchPhase::Playing
            || self.matchup.victory_pending
            || self.player.action != PlayerAction::Idle
    }
}
