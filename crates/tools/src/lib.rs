//! Developer Tooling: read-only match inspection for the desktop panel and the CLI.
//!
//! # Invariants
//! - Tools never mutate the battlefield.

pub mod inspector;

pub use inspector::{MatchInspector, MatchSummary, UnitInfo};
