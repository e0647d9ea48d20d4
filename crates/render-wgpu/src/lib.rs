//! wgpu render backend for castlefront.
//!
//! Tessellates a [`castlefront_render::Scene`] into coloured triangles and
//! draws them under an orthographic camera that letterboxes the field into the
//! window. Text commands are left to the UI layer.
//!
//! # Invariants
//! - Renderer never mutates match state; it only sees draw commands.
//! - Field coordinates have their origin top-left with y pointing down.

mod camera;
mod gpu;
mod shaders;
mod tessellate;

pub use camera::FieldCamera;
pub use gpu::WgpuRenderer;
pub use tessellate::{ColorVertex, tessellate};
