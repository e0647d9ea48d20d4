use castlefront_common::{Side, UnitId};
use castlefront_kernel::{Battlefield, MatchPhase};
use serde::Serialize;

/// Match inspector for developer tooling.
///
/// Read-only queries against the battlefield for debugging and the
/// inspector panel.
pub struct MatchInspector;

impl MatchInspector {
    /// Produce a summary of the match state.
    pub fn summary(battlefield: &Battlefield) -> MatchSummary {
        MatchSummary {
            tick: battlefield.tick(),
            elapsed: battlefield.elapsed(),
            seed: battlefield.seed(),
            phase: battlefield.phase(),
            player_castle_hp: battlefield.castle(Side::Player).hp(),
            enemy_castle_hp: battlefield.castle(Side::Enemy).hp(),
            player_units: battlefield.units(Side::Player).len(),
            enemy_units: battlefield.units(Side::Enemy).len(),
            next_enemy_in: battlefield.spawn_timer().interval()
                - battlefield.spawn_timer().elapsed(),
            pending_events: battlefield.events().len(),
        }
    }

    /// Look up one unit on either side.
    pub fn inspect_unit(battlefield: &Battlefield, id: UnitId) -> Option<UnitInfo> {
        battlefield
            .all_units()
            .find(|u| u.id() == id)
            .map(|u| UnitInfo {
                id: u.id(),
                side: u.side(),
                position: [u.position().x, u.position().y],
                hp: u.hp(),
            })
    }

    /// Every live unit, player side first.
    pub fn list_units(battlefield: &Battlefield) -> Vec<UnitId> {
        battlefield.all_units().map(|u| u.id()).collect()
    }
}

/// Summary of match state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub tick: u64,
    pub elapsed: f64,
    pub seed: u64,
    pub phase: MatchPhase,
    pub player_castle_hp: f32,
    pub enemy_castle_hp: f32,
    pub player_units: usize,
    pub enemy_units: usize,
    /// Seconds until the enemy spawn timer fires.
    pub next_enemy_in: f32,
    pub pending_events: usize,
}

impl std::fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let phase = match self.phase {
            MatchPhase::Live => "live".to_string(),
            MatchPhase::Ended(outcome) => format!("ended ({outcome})"),
        };
        write!(
            f,
            "Match: tick={} t={:.2}s seed={} phase={} castles={:.1}/{:.1} units={}/{} pending_events={}",
            self.tick,
            self.elapsed,
            self.seed,
            phase,
            self.player_castle_hp,
            self.enemy_castle_hp,
            self.player_units,
            self.enemy_units,
            self.pending_events
        )
    }
}

/// Detailed info about a single unit.
#[derive(Debug, Clone, Serialize)]
pub struct UnitInfo {
    pub id: UnitId,
    pub side: Side,
    pub position: [f32; 2],
    pub hp: f32,
}

impl std::fmt::Display for UnitInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unit [{}] {} pos=({:.2}, {:.2}) hp={:.2}",
            self.id, self.side, self.position[0], self.position[1], self.hp
        )
    }
}
