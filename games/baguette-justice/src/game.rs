use baguette_engine::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cues::ChargeTone;
use crate::justice::Justice;
use crate::state::{MatchPhase, Snapshot};
use crate::tuning::{Tuning, SHIPPED_TUNING};

// Game event kinds (Rust → React)
pub const EVENT_MATCH: f32 = 1.0;
pub const EVENT_ACTORS: f32 = 2.0;
pub const EVENT_TONE: f32 = 3.0;

// Custom event kinds (React → Rust)
pub const CUSTOM_MENU_START: u32 = 1;
pub const CUSTOM_RETRY: u32 = 2;
pub const CUSTOM_MENU_RETURN: u32 = 3;
pub const CUSTOM_PLAY_AGAIN: u32 = 4;

pub struct BaguetteJustice {
    justice: Justice,
}

impl BaguetteJustice {
    pub fn new() -> Self {
        Self::with_core(Justice::new(Self::shipped_tuning(), ChaCha8Rng::from_entropy()))
    }

    /// Reproducible enemy timings.
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::with_core(Justice::new(tuning, ChaCha8Rng::seed_from_u64(seed)))
    }

    fn with_core(justice: Justice) -> Self {
        Self { justice }
    }

    pub fn core(&self) -> &Justice {
        &self.justice
    }

    /// The compiled-in `tuning.json`, or the defaults if it does not validate.
    fn shipped_tuning() -> Tuning {
        match Tuning::from_json(SHIPPED_TUNING) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("shipped tuning rejected, using defaults: {}", e);
                Tuning::default()
            }
        }
    }

    /// Current snapshot as JSON for the overlay.
    pub fn snapshot_json(&self) -> String {
        match serde_json::to_string(&self.justice.snapshot()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("snapshot serialization failed: {}", e);
                String::from("{}")
            }
        }
    }

    fn select(&mut self, kind: u32, now_ms: f64) {
        let handled = match kind {
            CUSTOM_MENU_START => self.justice.select_menu_start(now_ms),
            CUSTOM_RETRY => self.justice.select_retry(now_ms),
            CUSTOM_MENU_RETURN => self.justice.select_menu_return(),
            CUSTOM_PLAY_AGAIN => self.justice.select_play_again(),
            _ => {
                log::warn!("unknown custom event kind {}", kind);
                return;
            }
        };
        if !handled {
            log::debug!("selection {} ignored in {:?}", kind, self.justice.phase());
        }
    }

    fn publish(&self, ctx: &mut EngineContext) {
        let Snapshot {
            phase,
            score,
            winning_score,
            enemy,
            player,
            charge_fraction,
        } = self.justice.snapshot();
        ctx.emit_event(GameEvent::new(EVENT_MATCH, phase.as_code(), score as f32, winning_score as f32));
        ctx.emit_event(GameEvent::new(EVENT_ACTORS, enemy.as_code(), player.as_code(), charge_fraction));
        if self.justice.tone_active() {
            ctx.emit_event(GameEvent::new(EVENT_TONE, ChargeTone::frequency(charge_fraction), 0.0, 0.0));
        }
    }
}

impl Default for BaguetteJustice {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for BaguetteJustice {
    fn init(&mut self, ctx: &mut EngineContext) {
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let now = ctx.now_ms();

        // Timers first, so input sees the enemy as it is at this instant.
        self.justice.advance(now);

        for event in input.iter() {
            match event {
                InputEvent::PointerDown { .. } => {
                    self.justice.begin_charge(now);
                }
                InputEvent::PointerUp { .. } => {
                    self.justice.release_charge(now);
                }
                InputEvent::Custom { kind, .. } => self.select(*kind, now),
            }
        }

        self.justice.sample_tick(now);

        for cue in self.justice.drain_cues() {
            ctx.emit_sound(cue.sound_event());
        }
        self.publish(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::{SOUND_CHARGE_START, SOUND_CLICK, SOUND_HIT};
    use crate::state::{EnemyState, PlayerAction};
    use baguette_web::GameRunner;

    const FRAME: f32 = 1.0 / 60.0;

    fn calm_runner() -> GameRunner<BaguetteJustice> {
        let tuning = Tuning {
            min_work_time_ms: 60_000,
            max_work_time_ms: 60_000,
            ..Tuning::default()
        };
        let mut runner = GameRunner::new(BaguetteJustice::with_seed(tuning, 11));
        runner.init();
        runner
    }

    fn frames(runner: &mut GameRunner<BaguetteJustice>, n: usize) {
        for _ in 0..n {
            runner.tick(FRAME);
        }
    }

    fn sounds(runner: &GameRunner<BaguetteJustice>) -> Vec<u32> {
        runner.context().sounds.iter().map(|s| s.0).collect()
    }

    fn event(runner: &GameRunner<BaguetteJustice>, kind: f32) -> Option<GameEvent> {
        runner.context().events.iter().rev().find(|e| e.kind == kind).copied()
    }

    #[test]
    fn menu_start_event_begins_an_episode() {
        let mut runner = calm_runner();
        runner.push_input(InputEvent::custom(CUSTOM_MENU_START));
        runner.tick(FRAME);
        assert_eq!(runner.game().core().phase(), MatchPhase::Playing);
        assert_eq!(sounds(&runner), vec![SOUND_CLICK]);

        let matchup = event(&runner, EVENT_MATCH).unwrap();
        assert_eq!(matchup.a, MatchPhase::Playing.as_code());
        assert_eq!(matchup.c, 100.0);
    }

    #[test]
    fn pointer_gesture_charges_and_strikes() {
        let mut runner = calm_runner();
        runner.push_input(InputEvent::custom(CUSTOM_MENU_START));
        runner.tick(FRAME);

        runner.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        runner.tick(FRAME);
        assert_eq!(sounds(&runner), vec![SOUND_CHARGE_START]);
        assert!(event(&runner, EVENT_TONE).is_some());

        frames(&mut runner, 90);
        let actors = event(&runner, EVENT_ACTORS).unwrap();
        assert_eq!(actors.b, PlayerAction::Charging.as_code());
        assert!(actors.c > 0.4 && actors.c < 0.6);
        let tone = event(&runner, EVENT_TONE).unwrap();
        assert!(tone.a > 200.0 && tone.a < 600.0);

        runner.push_input(InputEvent::PointerUp { x: 0.0, y: 0.0 });
        runner.tick(FRAME);
        assert!(event(&runner, EVENT_TONE).is_none());

        let mut heard_hit = false;
        for _ in 0..10 {
            runner.tick(FRAME);
            heard_hit |= sounds(&runner).contains(&SOUND_HIT);
        }
        assert!(heard_hit);
        let core = runner.game().core();
        assert_eq!(core.enemy_state(), EnemyState::Hit);
        assert!(core.score() > 1 && core.score() < 50);
    }

    #[test]
    fn unknown_custom_event_is_ignored() {
        let mut runner = calm_runner();
        runner.push_input(InputEvent::custom(99));
        runner.tick(FRAME);
        assert_eq!(runner.game().core().phase(), MatchPhase::Menu);
        assert!(sounds(&runner).is_empty());
    }

    #[test]
    fn production_game_runs_shipped_tuning() {
        let game = BaguetteJustice::new();
        assert_eq!(game.core().tuning(), &Tuning::default());
        assert_eq!(game.core().phase(), MatchPhase::Menu);
    }

    #[test]
    fn snapshot_json_reflects_the_core() {
        let game = BaguetteJustice::with_seed(Tuning::default(), 1);
        let json = game.snapshot_json();
        assert!(json.contains(r#""phase":"MENU""#));
        assert!(json.contains(r#""player":"IDLE""#));
    }
}
