use castlefront_common::{Side, UnitId};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;

/// A castle. Position and side are fixed; only hp changes, and only through stepping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Castle {
    side: Side,
    position: Vec2,
    hp: f32,
}

impl Castle {
    /// Build a castle at its configured position with full hp.
    pub fn new(side: Side, config: &MatchConfig) -> Self {
        Self {
            side,
            position: config.castle_position(side),
            hp: config.castle_max_hp,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    /// Whether the castle still has positive hp.
    pub fn is_standing(&self) -> bool {
        self.hp > 0.0
    }

    /// hp as a fraction of `max_hp`, clamped to `[0, 1]`.
    pub fn hp_ratio(&self, max_hp: f32) -> f32 {
        (self.hp / max_hp).clamp(0.0, 1.0)
    }

    pub(crate) fn take_damage(&mut self, amount: f32) {
        self.hp -= amount;
    }

    pub(crate) fn clamp_hp(&mut self) {
        self.hp = self.hp.max(0.0);
    }
}

/// A unit marching on the opposing castle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    side: Side,
    position: Vec2,
    radius: f32,
    speed: f32,
    hp: f32,
}

impl Unit {
    /// Build a unit with the configured radius, speed and starting hp.
    pub fn new(id: UnitId, side: Side, position: Vec2, config: &MatchConfig) -> Self {
        Self {
            id,
            side,
            position,
            radius: config.unit_radius,
            speed: config.unit_speed,
            hp: config.unit_hp,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub(crate) fn take_damage(&mut self, amount: f32) {
        self.hp -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castle_starts_full() {
        let config = MatchConfig::default();
        let castle = Castle::new(Side::Enemy, &config);
        assert_eq!(castle.hp(), 100.0);
        assert_eq!(castle.hp_ratio(config.castle_max_hp), 1.0);
        assert!(castle.is_standing());
    }

    #[test]
    fn castle_clamp_floors_at_zero() {
        let config = MatchConfig::default();
        let mut castle = Castle::new(Side::Player, &config);
        castle.take_damage(250.0);
        assert!(castle.hp() < 0.0);
        castle.clamp_hp();
        assert_eq!(castle.hp(), 0.0);
        assert!(!castle.is_standing());
        assert_eq!(castle.hp_ratio(config.castle_max_hp), 0.0);
    }

    #[test]
    fn unit_takes_configured_stats() {
        let config = MatchConfig::default();
        let unit = Unit::new(UnitId(3), Side::Player, Vec2::new(1.0, 2.0), &config);
        assert_eq!(unit.radius(), 8.0);
        assert_eq!(unit.speed(), 60.0);
        assert_eq!(unit.hp(), 10.0);
        assert_eq!(unit.side(), Side::Player);
    }

    #[test]
    fn unit_dies_at_zero_hp() {
        let config = MatchConfig::default();
        let mut unit = Unit::new(UnitId(0), Side::Enemy, Vec2::ZERO, &config);
        unit.take_damage(10.0);
        assert!(!unit.is_alive());
    }
}
