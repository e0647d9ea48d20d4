//! Unit placement and the enemy spawn timer.

use castlefront_common::Side;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;

/// Accumulates elapsed match time and fires once per interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    elapsed: f32,
    interval: f32,
}

impl SpawnTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            elapsed: 0.0,
            interval,
        }
    }

    /// Add `dt` seconds. Returns true, and restarts from zero, once the
    /// accumulated time reaches the interval. Fires at most once per call.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Where a fresh unit for `side` appears: one tile in front of its castle along
/// the advance axis, jittered uniformly by up to one tile along the other axis.
pub fn spawn_position<R: Rng + ?Sized>(config: &MatchConfig, side: Side, rng: &mut R) -> Vec2 {
    let castle = config.castle_position(side);
    let tile = config.tile_size;
    let jitter = rng.gen_range(-tile..=tile);
    Vec2::new(castle.x + side.advance_sign() * tile, castle.y + jitter)
}
