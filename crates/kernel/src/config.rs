//! Match configuration.
//!
//! Defaults reproduce the classic two-castle layout: an 800x600 field cut into
//! 40px tiles, castles two tiles in from each edge, a fresh enemy unit every
//! three seconds.

use castlefront_common::Side;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`MatchConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for one match. Every field has a default, so a YAML file only
/// needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Playing-field width in field units.
    pub field_width: f32,
    /// Playing-field height in field units.
    pub field_height: f32,
    /// Grid spacing; also the castle footprint and the spawn offset.
    pub tile_size: f32,
    /// Starting (and maximum) castle hp.
    pub castle_max_hp: f32,
    /// Collision radius of every unit.
    pub unit_radius: f32,
    /// Unit speed in field units per second.
    pub unit_speed: f32,
    /// Starting unit hp.
    pub unit_hp: f32,
    /// Damage per second dealt to each of two touching opposing units.
    pub unit_damage_per_second: f32,
    /// Damage per second a unit in reach deals to the opposing castle.
    pub castle_damage_per_second: f32,
    /// Seconds between automatic enemy spawns.
    pub enemy_spawn_interval: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            tile_size: 40.0,
            castle_max_hp: 100.0,
            unit_radius: 8.0,
            unit_speed: 60.0,
            unit_hp: 10.0,
            unit_damage_per_second: 10.0,
            castle_damage_per_second: 5.0,
            enemy_spawn_interval: 3.0,
        }
    }
}

impl MatchConfig {
    /// Parse a config from YAML and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded match config");
        Ok(config)
    }

    /// Check that every value is usable by the simulation.
    ///
    /// Sizes, hp and the spawn interval must be strictly positive; speed and
    /// damage rates may be zero (a frozen or harmless match is still valid).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("tile_size", self.tile_size),
            ("castle_max_hp", self.castle_max_hp),
            ("unit_radius", self.unit_radius),
            ("unit_hp", self.unit_hp),
            ("enemy_spawn_interval", self.enemy_spawn_interval),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        let non_negative = [
            ("unit_speed", self.unit_speed),
            ("unit_damage_per_second", self.unit_damage_per_second),
            ("castle_damage_per_second", self.castle_damage_per_second),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be zero or positive, got {value}"),
                });
            }
        }

        if self.tile_size * 4.0 > self.field_width {
            return Err(ConfigError::Invalid {
                field: "tile_size",
                reason: format!(
                    "castles sit two tiles from each edge; {} is too large for a field {} wide",
                    self.tile_size, self.field_width
                ),
            });
        }
        Ok(())
    }

    /// Field extents as a vector.
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    /// The x coordinate splitting the player half from the enemy half.
    pub fn midpoint_x(&self) -> f32 {
        self.field_width / 2.0
    }

    /// Fixed castle position for a side.
    pub fn castle_position(&self, side: Side) -> Vec2 {
        let y = self.field_height / 2.0;
        match side {
            Side::Player => Vec2::new(self.tile_size * 2.0, y),
            Side::Enemy => Vec2::new(self.field_width - self.tile_size * 2.0, y),
        }
    }

    /// Extra reach a unit gets when hitting a castle: half the castle footprint.
    pub fn castle_half_extent(&self) -> f32 {
        self.tile_size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.midpoint_x(), 400.0);
    }

    #[test]
    fn castle_positions_face_each_other() {
        let config = MatchConfig::default();
        assert_eq!(config.castle_position(Side::Player), Vec2::new(80.0, 300.0));
        assert_eq!(config.castle_position(Side::Enemy), Vec2::new(720.0, 300.0));
    }

    #[test]
    fn yaml_overrides_only_named_fields() {
        let config = MatchConfig::from_yaml_str("unit_speed: 120\nenemy_spawn_interval: 1.5\n")
            .unwrap();
        assert_eq!(config.unit_speed, 120.0);
        assert_eq!(config.enemy_spawn_interval, 1.5);
        assert_eq!(config.tile_size, 40.0);
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let err = MatchConfig::from_yaml_str("field_width: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "field_width",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_speed_but_allows_zero() {
        assert!(MatchConfig::from_yaml_str("unit_speed: 0\n").is_ok());
        assert!(MatchConfig::from_yaml_str("unit_speed: -1\n").is_err());
    }

    #[test]
    fn rejects_oversized_tiles() {
        let err = MatchConfig::from_yaml_str("field_width: 100\ntile_size: 40\n").unwrap_err();
        assert!(err.to_string().contains("tile_size"));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = MatchConfig::from_yaml_str("unit_speed: [fast").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "unit_hp: 25").unwrap();
        let config = MatchConfig::load(file.path()).unwrap();
        assert_eq!(config.unit_hp, 25.0);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MatchConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
