//! Motion and combat stepping.
//!
//! One step runs, in order: enemy spawn timer, movement, unit-vs-unit combat,
//! unit-vs-castle damage, removal of defeated units, castle hp clamp.

use castlefront_common::{Side, UnitId};
use glam::Vec2;

use crate::battlefield::{Battlefield, MatchEvent};
use crate::entity::{Castle, Unit};

/// Direction used when a unit already stands on its target.
const FALLBACK_DIRECTION: Vec2 = Vec2::X;

impl Battlefield {
    /// Advance the match by `dt` seconds.
    ///
    /// Does nothing once the match has ended. Negative or non-finite `dt` is
    /// treated as zero. Returns whether a step was taken.
    pub fn step(&mut self, dt: f32) -> bool {
        if !self.is_live() {
            return false;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let _span = tracing::trace_span!("match_step", tick = self.tick + 1).entered();

        if self.spawn_timer.advance(dt) {
            self.spawn_unit(Side::Enemy);
        }

        let player_target = self.enemy_castle.position();
        let enemy_target = self.player_castle.position();
        for unit in &mut self.player_units {
            advance(unit, player_target, dt);
        }
        for unit in &mut self.enemy_units {
            advance(unit, enemy_target, dt);
        }

        resolve_unit_combat(
            &mut self.player_units,
            &mut self.enemy_units,
            self.config.unit_damage_per_second * dt,
        );

        let castle_hit = self.config.castle_damage_per_second * dt;
        let reach_pad = self.config.castle_half_extent();
        let to_enemy = castle_damage(&self.player_units, &self.enemy_castle, reach_pad, castle_hit);
        let to_player = castle_damage(&self.enemy_units, &self.player_castle, reach_pad, castle_hit);
        let hp_before = [
            (Side::Enemy, self.enemy_castle.hp()),
            (Side::Player, self.player_castle.hp()),
        ];
        self.enemy_castle.take_damage(to_enemy);
        self.player_castle.take_damage(to_player);

        for side in [Side::Player, Side::Enemy] {
            for id in remove_defeated(self.units_mut(side)) {
                tracing::debug!(%id, %side, "unit defeated");
                self.event_log.push(MatchEvent::UnitDefeated { id, side });
            }
        }

        self.player_castle.clamp_hp();
        self.enemy_castle.clamp_hp();

        for (side, before) in hp_before {
            let remaining = self.castle(side).hp();
            let amount = before - remaining;
            if amount > 0.0 {
                self.event_log.push(MatchEvent::CastleDamaged {
                    side,
                    amount,
                    remaining,
                });
            }
        }

        self.tick += 1;
        self.elapsed += f64::from(dt);
        self.event_log.push(MatchEvent::Stepped {
            tick: self.tick,
            dt,
        });

        if let Some(outcome) = self.phase().outcome() {
            tracing::info!(tick = self.tick, %outcome, "match ended");
            self.event_log.push(MatchEvent::MatchEnded {
                tick: self.tick,
                outcome,
            });
        }
        true
    }
}

/// Move `unit` straight toward `target` by `speed * dt`, stopping on arrival.
///
/// Travel is capped at the remaining distance, so a unit never passes its
/// target and never ends a step farther away than it started. Arrivals stack
/// on the castle centre instead of overshooting and jittering around it.
pub fn advance(unit: &mut Unit, target: Vec2, dt: f32) {
    let offset = target - unit.position();
    let distance = offset.length();
    let direction = if distance > 0.0 {
        offset / distance
    } else {
        FALLBACK_DIRECTION
    };
    let travel = (unit.speed() * dt).min(distance);
    unit.translate(direction * travel);
}

/// Circle overlap: centres strictly closer than the sum of the radii.
pub fn overlapping(a: &Unit, b: &Unit) -> bool {
    a.position().distance(b.position()) < a.radius() + b.radius()
}

/// Every touching (player, enemy) pair loses `damage` on both sides.
///
/// A unit touching several enemies takes damage from each of them.
pub fn resolve_unit_combat(player: &mut [Unit], enemy: &mut [Unit], damage: f32) {
    for a in player.iter_mut() {
        for b in enemy.iter_mut() {
            if overlapping(a, b) {
                a.take_damage(damage);
                b.take_damage(damage);
            }
        }
    }
}

/// Total damage `units` deal to `castle` this step: `hit` for every unit whose
/// centre is within its radius plus `reach_pad` of the castle centre.
pub fn castle_damage(units: &[Unit], castle: &Castle, reach_pad: f32, hit: f32) -> f32 {
    units
        .iter()
        .filter(|u| u.position().distance(castle.position()) < u.radius() + reach_pad)
        .map(|_| hit)
        .sum()
}

/// Drop every unit with hp <= 0, returning the ids removed.
pub fn remove_defeated(units: &mut Vec<Unit>) -> Vec<UnitId> {
    let mut removed = Vec::new();
    units.retain(|u| {
        if u.is_alive() {
            true
        } else {
            removed.push(u.id());
            false
        }
    });
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::phase::MatchPhase;
    use castlefront_common::Outcome;
    use proptest::prelude::*;

    fn frozen() -> MatchConfig {
        MatchConfig {
            unit_speed: 0.0,
            ..MatchConfig::default()
        }
    }

    fn unit_at(side: Side, x: f32, y: f32) -> Unit {
        Unit::new(UnitId(0), side, Vec2::new(x, y), &MatchConfig::default())
    }

    #[test]
    fn movement_heads_for_enemy_castle() {
        let mut unit = unit_at(Side::Player, 120.0, 300.0);
        advance(&mut unit, Vec2::new(720.0, 300.0), 1.0);
        assert_eq!(unit.position(), Vec2::new(180.0, 300.0));
    }

    #[test]
    fn movement_stops_on_target() {
        let mut unit = unit_at(Side::Enemy, 90.0, 300.0);
        advance(&mut unit, Vec2::new(80.0, 300.0), 1.0);
        assert_eq!(unit.position(), Vec2::new(80.0, 300.0));
        advance(&mut unit, Vec2::new(80.0, 300.0), 1.0);
        assert_eq!(unit.position(), Vec2::new(80.0, 300.0));
        assert!(unit.position().is_finite());
    }

    #[test]
    fn overlap_is_strict() {
        let a = unit_at(Side::Player, 0.0, 0.0);
        let touching = unit_at(Side::Enemy, 16.0, 0.0);
        let inside = unit_at(Side::Enemy, 15.9, 0.0);
        assert!(!overlapping(&a, &touching));
        assert!(overlapping(&a, &inside));
    }

    #[test]
    fn overlapping_pair_trades_damage() {
        let mut player = vec![unit_at(Side::Player, 400.0, 300.0)];
        let mut enemy = vec![unit_at(Side::Enemy, 405.0, 300.0)];
        resolve_unit_combat(&mut player, &mut enemy, 10.0 * 0.25);
        assert_eq!(player[0].hp(), 7.5);
        assert_eq!(enemy[0].hp(), 7.5);
    }

    #[test]
    fn distant_units_are_untouched() {
        let mut player = vec![unit_at(Side::Player, 100.0, 300.0)];
        let mut enemy = vec![unit_at(Side::Enemy, 600.0, 300.0)];
        resolve_unit_combat(&mut player, &mut enemy, 10.0);
        assert_eq!(player[0].hp(), 10.0);
        assert_eq!(enemy[0].hp(), 10.0);
    }

    #[test]
    fn one_unit_against_two_takes_both_hits() {
        let mut player = vec![unit_at(Side::Player, 400.0, 300.0)];
        let mut enemy = vec![
            unit_at(Side::Enemy, 404.0, 300.0),
            unit_at(Side::Enemy, 396.0, 300.0),
        ];
        resolve_unit_combat(&mut player, &mut enemy, 1.0);
        assert_eq!(player[0].hp(), 8.0);
        assert!(enemy.iter().all(|u| u.hp() == 9.0));
    }

    #[test]
    fn castle_damage_counts_units_in_reach() {
        let config = MatchConfig::default();
        let castle = Castle::new(Side::Enemy, &config);
        let units = vec![
            unit_at(Side::Player, 720.0, 300.0),
            unit_at(Side::Player, 700.0, 300.0),
            unit_at(Side::Player, 600.0, 300.0),
        ];
        let dealt = castle_damage(&units, &castle, config.castle_half_extent(), 5.0);
        assert_eq!(dealt, 10.0);
    }

    #[test]
    fn castle_reach_is_strict() {
        let config = MatchConfig::default();
        let castle = Castle::new(Side::Enemy, &config);
        let edge = vec![unit_at(Side::Player, 720.0 - 28.0, 300.0)];
        assert_eq!(castle_damage(&edge, &castle, config.castle_half_extent(), 5.0), 0.0);
    }

    #[test]
    fn remove_defeated_keeps_survivors() {
        let mut units = vec![
            unit_at(Side::Enemy, 0.0, 0.0),
            unit_at(Side::Enemy, 1.0, 0.0),
            unit_at(Side::Enemy, 2.0, 0.0),
        ];
        units[1].take_damage(10.0);
        units[2].take_damage(3.0);
        let removed = remove_defeated(&mut units);
        assert_eq!(removed.len(), 1);
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(Unit::is_alive));
    }

    #[test]
    fn cleanup_is_idempotent() {
        let mut units = vec![unit_at(Side::Player, 0.0, 0.0), unit_at(Side::Player, 1.0, 0.0)];
        units[0].take_damage(20.0);
        remove_defeated(&mut units);
        let once = units.clone();
        let removed = remove_defeated(&mut units);
        assert!(removed.is_empty());
        assert_eq!(units, once);
    }

    #[test]
    fn mutual_kill_in_one_step() {
        let mut field = Battlefield::new(frozen()).unwrap();
        field.place_unit(Side::Player, Vec2::new(400.0, 300.0));
        field.place_unit(Side::Enemy, Vec2::new(404.0, 300.0));
        assert!(field.step(1.0));
        assert_eq!(field.unit_count(), 0);
        let defeated = field
            .events()
            .iter()
            .filter(|e| matches!(e, MatchEvent::UnitDefeated { .. }))
            .count();
        assert_eq!(defeated, 2);
    }

    #[test]
    fn enemy_timer_spawns_once_after_three_seconds() {
        let mut field = Battlefield::new(MatchConfig::default()).unwrap();
        field.step(1.0);
        field.step(1.0);
        assert_eq!(field.units(Side::Enemy).len(), 0);
        field.step(1.0);
        assert_eq!(field.units(Side::Enemy).len(), 1);
        assert!(field.spawn_timer().elapsed().abs() < 1e-6);
    }

    #[test]
    fn castle_under_siege_loses_five_per_second() {
        let mut field = Battlefield::new(frozen()).unwrap();
        let castle = field.castle(Side::Enemy).position();
        field.place_unit(Side::Player, castle - Vec2::new(10.0, 0.0));
        field.step(0.5);
        assert_eq!(field.castle(Side::Enemy).hp(), 97.5);
        assert_eq!(field.castle(Side::Player).hp(), 100.0);
    }

    #[test]
    fn castle_damage_event_reports_hp_lost() {
        let mut field = Battlefield::new(frozen()).unwrap();
        let castle = field.castle(Side::Enemy).position();
        field.place_unit(Side::Player, castle);
        field.drain_events();
        field.step(0.5);
        let damaged: Vec<_> = field
            .events()
            .iter()
            .filter(|e| matches!(e, MatchEvent::CastleDamaged { .. }))
            .cloned()
            .collect();
        assert_eq!(
            damaged,
            vec![MatchEvent::CastleDamaged {
                side: Side::Enemy,
                amount: 2.5,
                remaining: 97.5,
            }]
        );
    }

    #[test]
    fn castle_damage_event_is_clamped_at_zero() {
        let config = MatchConfig {
            castle_max_hp: 3.0,
            unit_speed: 0.0,
            ..MatchConfig::default()
        };
        let mut field = Battlefield::new(config).unwrap();
        let castle = field.castle(Side::Enemy).position();
        field.place_unit(Side::Player, castle);
        field.place_unit(Side::Player, castle);
        field.drain_events();
        // Two units deal 5 hp in half a second; only 3 hp are left to lose.
        field.step(0.5);
        let damaged: Vec<_> = field
            .events()
            .iter()
            .filter(|e| matches!(e, MatchEvent::CastleDamaged { .. }))
            .cloned()
            .collect();
        assert_eq!(
            damaged,
            vec![MatchEvent::CastleDamaged {
                side: Side::Enemy,
                amount: 3.0,
                remaining: 0.0,
            }]
        );
    }

    #[test]
    fn fallen_castle_freezes_the_match() {
        let config = MatchConfig {
            castle_max_hp: 2.0,
            ..MatchConfig::default()
        };
        let mut field = Battlefield::new(config).unwrap();
        let castle = field.castle(Side::Player).position();
        field.place_unit(Side::Enemy, castle);
        field.place_unit(Side::Player, Vec2::new(200.0, 300.0));
        assert!(field.step(1.0));
        assert_eq!(field.castle(Side::Player).hp(), 0.0);
        assert_eq!(field.phase(), MatchPhase::Ended(Outcome::EnemyVictory));

        let before = field.state_hash();
        let positions: Vec<Vec2> = field.all_units().map(Unit::position).collect();
        assert!(!field.step(1.0));
        assert!(!field.step(5.0));
        assert_eq!(field.state_hash(), before);
        let after: Vec<Vec2> = field.all_units().map(Unit::position).collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn simultaneous_fall_ends_in_draw() {
        let config = MatchConfig {
            castle_max_hp: 1.0,
            unit_speed: 0.0,
            ..MatchConfig::default()
        };
        let mut field = Battlefield::new(config).unwrap();
        let player_castle = field.castle(Side::Player).position();
        let enemy_castle = field.castle(Side::Enemy).position();
        field.place_unit(Side::Enemy, player_castle);
        field.place_unit(Side::Player, enemy_castle);
        field.step(1.0);
        assert_eq!(field.phase(), MatchPhase::Ended(Outcome::Draw));
        assert!(field.events().contains(&MatchEvent::MatchEnded {
            tick: 1,
            outcome: Outcome::Draw,
        }));
    }

    #[test]
    fn bad_dt_is_treated_as_zero() {
        let mut field = Battlefield::new(MatchConfig::default()).unwrap();
        let id = field.place_unit(Side::Player, Vec2::new(120.0, 300.0));
        field.step(f32::NAN);
        field.step(-4.0);
        let unit = field.units(Side::Player).iter().find(|u| u.id() == id).unwrap();
        assert_eq!(unit.position(), Vec2::new(120.0, 300.0));
        assert_eq!(field.spawn_timer().elapsed(), 0.0);
        assert_eq!(field.tick(), 2);
    }

    proptest! {
        #[test]
        fn movement_never_moves_away(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            dt in 0.0f32..5.0,
        ) {
            let target = Vec2::new(720.0, 300.0);
            let mut unit = unit_at(Side::Player, x, y);
            let before = unit.position().distance(target);
            advance(&mut unit, target, dt);
            let after = unit.position().distance(target);
            prop_assert!(after <= before + 1e-3);
        }

        #[test]
        fn touching_pair_loses_exactly_rate_times_dt(
            gap in 0.0f32..15.9,
            dt in 0.0f32..0.9,
        ) {
            let mut player = vec![unit_at(Side::Player, 400.0, 300.0)];
            let mut enemy = vec![unit_at(Side::Enemy, 400.0 + gap, 300.0)];
            resolve_unit_combat(&mut player, &mut enemy, 10.0 * dt);
            prop_assert!((player[0].hp() - (10.0 - 10.0 * dt)).abs() < 1e-4);
            prop_assert!((enemy[0].hp() - (10.0 - 10.0 * dt)).abs() < 1e-4);
            prop_assert!(player[0].hp() <= 10.0);
        }

        #[test]
        fn castle_hp_never_negative(steps in 1usize..200, dt in 0.0f32..2.0) {
            let mut field = Battlefield::new(MatchConfig::default()).unwrap();
            let castle = field.castle(Side::Player).position();
            for _ in 0..5 {
                field.place_unit(Side::Enemy, castle);
            }
            for _ in 0..steps {
                field.step(dt);
            }
            prop_assert!(field.castle(Side::Player).hp() >= 0.0);
            prop_assert!(field.castle(Side::Enemy).hp() >= 0.0);
        }
    }
}
