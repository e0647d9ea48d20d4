//! Shared value types used across the castlefront crates.

mod types;

pub use types::{Outcome, Side, UnitId};
