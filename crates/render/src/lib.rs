//! Render Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers cannot mutate match state; they only read the battlefield.
//! - The end-of-match overlay is driven by the `MatchPhase` handed in by the
//!   frame driver, the same value that gates stepping.
//!
//! Backends either consume the [`Scene`] draw-command list (the wgpu backend)
//! or implement [`Renderer`] directly (the text renderer used by the CLI).

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer, SceneRenderer};
pub use scene::{Color, DrawCommand, Scene, palette};
