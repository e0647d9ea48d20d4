//! Match Kernel: authoritative castle and unit state, spawning, motion and combat stepping.
//!
//! # Invariants
//! - Step is pure with respect to (state, dt, rng state); all randomness is seeded.
//! - All state mutations flow through `Battlefield` operations.
//! - Castle hp stays within `[0, castle_max_hp]`; units with hp <= 0 never outlive a step.

pub mod battlefield;
pub mod config;
pub mod entity;
pub mod phase;
pub mod spawner;
pub mod step;

pub use battlefield::{Battlefield, MatchEvent};
pub use config::{ConfigError, MatchConfig};
pub use entity::{Castle, Unit};
pub use phase::MatchPhase;
pub use spawner::SpawnTimer;
