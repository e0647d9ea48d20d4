//! Frame Driver: turns host timestamps into simulation steps and renders.
//!
//! # Invariants
//! - The match phase is evaluated once per frame; that value gates the step
//!   and is handed to the renderer.
//! - Rendering happens every frame, including after the match has ended.
//! - The host owns scheduling; the driver never sleeps or loops on its own.

mod clock;
mod driver;
mod timer;

pub use clock::FrameClock;
pub use driver::{ActionResult, Frame, FrameDriver};
pub use timer::FrameTimer;
