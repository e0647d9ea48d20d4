//! Input mapping: raw pointer and key presses become match `Action`s.
//!
//! # Invariants
//! - The kernel consumes actions, never raw input events.
//! - Presses outside the field map to `Action::Noop`.

pub mod action;
pub mod mapper;

pub use action::{Action, Key};
pub use mapper::{FieldBounds, InputMapper};
