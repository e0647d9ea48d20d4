use castlefront_common::Outcome;
use serde::{Deserialize, Serialize};

/// Whether a match is still being fought.
///
/// Derived from castle hp, never stored: the frame driver evaluates it once per
/// frame and both the step gate and the end-of-match overlay read that value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Live,
    Ended(Outcome),
}

impl MatchPhase {
    /// Phase for the given castle hp values.
    pub fn evaluate(player_castle_hp: f32, enemy_castle_hp: f32) -> Self {
        match (player_castle_hp > 0.0, enemy_castle_hp > 0.0) {
            (true, true) => Self::Live,
            (false, false) => Self::Ended(Outcome::Draw),
            (false, true) => Self::Ended(Outcome::EnemyVictory),
            (true, false) => Self::Ended(Outcome::PlayerVictory),
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Live => None,
            Self::Ended(outcome) => Some(outcome),
        }
    }
}
