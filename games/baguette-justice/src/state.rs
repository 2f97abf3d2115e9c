use serde::Serialize;

/// Top-level match phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchPhase {
    Menu,
    Playing,
    GameOver,
    Victory,
}

impl MatchPhase {
    /// Wire code used in game events.
    pub fn as_code(self) -> f32 {
        match self {
            MatchPhase::Menu => 0.0,
            MatchPhase::Playing => 1.0,
            MatchPhase::GameOver => 2.0,
            MatchPhase::Victory => 3.0,
        }
    }
}

/// What the target is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnemyState {
    /// Back turned, safe.
    Working,
    /// About to turn, warning.
    Alert,
    /// Turned around, dangerous.
    Watching,
    /// Stunned by a strike.
    Hit,
    /// Caught the player; terminal until the next episode.
    CaughtYou,
}

impl EnemyState {
    /// Charging or striking in this state loses the match.
    pub fn is_dangerous(self) -> bool {
        matches!(self, EnemyState::Watching | EnemyState::CaughtYou)
    }

    pub fn as_code(self) -> f32 {
        match self {
            EnemyState::Working => 0.0,
            EnemyState::Alert => 1.0,
            EnemyState::Watching => 2.0,
            EnemyState::Hit => 3.0,
            EnemyState::CaughtYou => 4.0,
        }
    }
}

/// The player's arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerAction {
    Idle,
    Charging,
    /// Swing lockout between release and reset.
    Swinging,
}

impl PlayerAction {
    pub fn as_code(self) -> f32 {
        match self {
            PlayerAction::Idle => 0.0,
            PlayerAction::Charging => 1.0,
            PlayerAction::Swinging => 2.0,
        }
    }
}

/// Everything the presentation layer renders, captured at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: MatchPhase,
    pub score: u32,
    pub winning_score: u32,
    pub enemy: EnemyState,
    pub player: PlayerAction,
    pub charge_fraction: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_watching_and_caught_are_dangerous() {
        let dangerous: Vec<EnemyState> = [
            EnemyState::Working,
            EnemyState::Alert,
            EnemyState::Watching,
            EnemyState::Hit,
            EnemyState::CaughtYou,
        ]
        .into_iter()
        .filter(|s| s.is_dangerous())
        .collect();
        assert_eq!(dangerous, vec![EnemyState::Watching, EnemyState::CaughtYou]);
    }

    #[test]
    fn snapshot_serializes_for_the_ui() {
        let snapshot = Snapshot {
            phase: MatchPhase::GameOver,
            score: 12,
            winning_score: 100,
            enemy: EnemyState::CaughtYou,
            player: PlayerAction::Idle,
            charge_fraction: 0.0,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""phase":"GAME_OVER""#));
        assert!(json.contains(r#""enemy":"CAUGHT_YOU""#));
        assert!(json.contains(r#""winningScore":100"#));
        assert!(json.contains(r#""chargeFraction":0.0"#));
    }
}
