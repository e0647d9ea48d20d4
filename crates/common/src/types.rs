use serde::{Deserialize, Serialize};

/// Which army an entity fights for. Never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// The side this one marches against.
    pub fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }

    /// Sign of the advance axis: player units march toward +x, enemy units toward -x.
    pub fn advance_sign(self) -> f32 {
        match self {
            Self::Player => 1.0,
            Self::Enemy => -1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => f.write_str("player"),
            Self::Enemy => f.write_str("enemy"),
        }
    }
}

/// Identifier for a unit, allocated monotonically per match.
///
/// Plain counters instead of random ids keep seeded replays bit-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u64);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The enemy castle fell.
    PlayerVictory,
    /// The player castle fell.
    EnemyVictory,
    /// Both castles fell during the same step.
    Draw,
}

impl Outcome {
    /// Message shown on the end-of-match overlay.
    pub fn banner(self) -> &'static str {
        match self {
            Self::PlayerVictory => "you won",
            Self::EnemyVictory => "you lost",
            Self::Draw => "draw",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.banner())
    }
}
