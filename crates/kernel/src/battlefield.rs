use castlefront_common::{Outcome, Side, UnitId};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, MatchConfig};
use crate::entity::{Castle, Unit};
use crate::phase::MatchPhase;
use crate::spawner::{SpawnTimer, spawn_position};

/// An event record produced by every notable mutation of the battlefield.
///
/// Consumers drain the log each frame (the desktop app logs it, the CLI can
/// dump it as JSON). Per-step castle damage is aggregated into one event per castle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A unit entered the field.
    UnitSpawned {
        id: UnitId,
        side: Side,
        position: Vec2,
    },
    /// A unit dropped to zero hp and was removed.
    UnitDefeated { id: UnitId, side: Side },
    /// A castle took damage during a step. `amount` is the hp actually lost
    /// and `remaining` the hp left, both after clamping at zero.
    CastleDamaged {
        side: Side,
        amount: f32,
        remaining: f32,
    },
    /// The simulation advanced one step by `dt` seconds.
    Stepped { tick: u64, dt: f32 },
    /// The step that brought a castle down.
    MatchEnded { tick: u64, outcome: Outcome },
    /// Castles and units were restored to their starting state.
    MatchReset { seed: u64 },
}

/// The authoritative match state: two castles, one unit collection per side
/// and the enemy spawn timer.
///
/// Owned by the frame driver and passed by reference to whatever needs it;
/// there is no global state. All randomness comes from a seeded `ChaCha8Rng`,
/// so the same seed and the same sequence of dts and spawn requests produce
/// the same match.
#[derive(Debug, Clone)]
pub struct Battlefield {
    pub(crate) config: MatchConfig,
    pub(crate) player_castle: Castle,
    pub(crate) enemy_castle: Castle,
    pub(crate) player_units: Vec<Unit>,
    pub(crate) enemy_units: Vec<Unit>,
    pub(crate) spawn_timer: SpawnTimer,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) seed: u64,
    pub(crate) next_unit_id: u64,
    pub(crate) tick: u64,
    pub(crate) elapsed: f64,
    pub(crate) event_log: Vec<MatchEvent>,
}

impl Battlefield {
    /// Start a match with seed 0.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, 0)
    }

    /// Start a match whose spawn jitter is drawn from `seed`.
    ///
    /// The config is validated first; spawning and grid layout rely on a
    /// positive tile size and field extents.
    pub fn with_seed(config: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            player_castle: Castle::new(Side::Player, &config),
            enemy_castle: Castle::new(Side::Enemy, &config),
            player_units: Vec::new(),
            enemy_units: Vec::new(),
            spawn_timer: SpawnTimer::new(config.enemy_spawn_interval),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            next_unit_id: 0,
            tick: 0,
            elapsed: 0.0,
            event_log: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of steps taken since the match started.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since the match started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn spawn_timer(&self) -> &SpawnTimer {
        &self.spawn_timer
    }

    pub fn castle(&self, side: Side) -> &Castle {
        match side {
            Side::Player => &self.player_castle,
            Side::Enemy => &self.enemy_castle,
        }
    }

    /// Both castles, player first.
    pub fn castles(&self) -> [&Castle; 2] {
        [&self.player_castle, &self.enemy_castle]
    }

    pub fn units(&self, side: Side) -> &[Unit] {
        match side {
            Side::Player => &self.player_units,
            Side::Enemy => &self.enemy_units,
        }
    }

    /// Every unit on the field, player units first.
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.player_units.iter().chain(self.enemy_units.iter())
    }

    pub fn unit_count(&self) -> usize {
        self.player_units.len() + self.enemy_units.len()
    }

    /// Current phase, derived from castle hp.
    pub fn phase(&self) -> MatchPhase {
        MatchPhase::evaluate(self.player_castle.hp(), self.enemy_castle.hp())
    }

    pub fn is_live(&self) -> bool {
        self.phase().is_live()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[MatchEvent] {
        &self.event_log
    }

    /// Spawn a unit for `side` in front of its castle. Always succeeds.
    pub fn spawn_unit(&mut self, side: Side) -> UnitId {
        let position = spawn_position(&self.config, side, &mut self.rng);
        self.place_unit(side, position)
    }

    /// Spawn a unit for `side` at an exact position.
    pub fn place_unit(&mut self, side: Side, position: Vec2) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        let unit = Unit::new(id, side, position, &self.config);
        self.units_mut(side).push(unit);
        tracing::debug!(%id, %side, x = position.x, y = position.y, "unit spawned");
        self.event_log
            .push(MatchEvent::UnitSpawned { id, side, position });
        id
    }

    /// Spawn on behalf of an input event. Refused once the requesting side's
    /// castle has fallen.
    pub fn request_spawn(&mut self, side: Side) -> Option<UnitId> {
        if !self.castle(side).is_standing() {
            tracing::debug!(%side, "spawn refused: castle has fallen");
            return None;
        }
        Some(self.spawn_unit(side))
    }

    /// Restore both castles and clear the field for a rematch.
    ///
    /// The RNG keeps its stream, so a recorded session with restarts still
    /// replays identically.
    pub fn reset(&mut self) {
        self.player_castle = Castle::new(Side::Player, &self.config);
        self.enemy_castle = Castle::new(Side::Enemy, &self.config);
        self.player_units.clear();
        self.enemy_units.clear();
        self.spawn_timer.reset();
        self.tick = 0;
        self.elapsed = 0.0;
        tracing::info!(seed = self.seed, "match reset");
        self.event_log
            .push(MatchEvent::MatchReset { seed: self.seed });
    }

    /// Deterministic FNV-1a hash of the match state, for replay comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.spawn_timer.elapsed().to_le_bytes());
        for castle in self.castles() {
            mix(&mut h, &castle.hp().to_le_bytes());
        }
        for unit in self.all_units() {
            mix(&mut h, &unit.id().0.to_le_bytes());
            mix(&mut h, &[unit.side() as u8]);
            mix(&mut h, &unit.position().x.to_le_bytes());
            mix(&mut h, &unit.position().y.to_le_bytes());
            mix(&mut h, &unit.hp().to_le_bytes());
        }
        h
    }

    pub(crate) fn units_mut(&mut self, side: Side) -> &mut Vec<Unit> {
        match side {
            Side::Player => &mut self.player_units,
            Side::Enemy => &mut self.enemy_units,
        }
    }
}
