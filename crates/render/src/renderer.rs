use castlefront_common::Side;
use castlefront_kernel::{Battlefield, MatchPhase};
use std::fmt::Write;

use crate::scene::Scene;

/// Which optional layers to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderView {
    pub show_grid: bool,
    pub show_hp_bars: bool,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_hp_bars: true,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the battlefield, the phase the frame driver evaluated
/// for this frame, and a view configuration. It never mutates the match.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, battlefield: &Battlefield, phase: MatchPhase, view: &RenderView)
    -> Self::Output;
}

/// Produces the draw-command [`Scene`] consumed by GPU backends.
#[derive(Debug, Default)]
pub struct SceneRenderer;

impl SceneRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for SceneRenderer {
    type Output = Scene;

    fn render(&self, battlefield: &Battlefield, phase: MatchPhase, view: &RenderView) -> Scene {
        Scene::build(battlefield, phase, view)
    }
}

/// Human-readable dump of the match, for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, battlefield: &Battlefield, phase: MatchPhase, _view: &RenderView) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Match (tick={}, t={:.2}s, seed={}) ===",
            battlefield.tick(),
            battlefield.elapsed(),
            battlefield.seed()
        );
        match phase {
            MatchPhase::Live => {
                let _ = writeln!(
                    out,
                    "Phase: live (next enemy in {:.2}s)",
                    battlefield.spawn_timer().interval() - battlefield.spawn_timer().elapsed()
                );
            }
            MatchPhase::Ended(outcome) => {
                let _ = writeln!(out, "Phase: ended ({outcome})");
            }
        }
        for castle in battlefield.castles() {
            let p = castle.position();
            let _ = writeln!(
                out,
                "{} castle: hp={:.1} at ({:.0}, {:.0})",
                castle.side(),
                castle.hp(),
                p.x,
                p.y
            );
        }
        let _ = writeln!(
            out,
            "Units: player={} enemy={}",
            battlefield.units(Side::Player).len(),
            battlefield.units(Side::Enemy).len()
        );
        for unit in battlefield.all_units() {
            let p = unit.position();
            let _ = writeln!(
                out,
                "  [{}] {} pos=({:.2}, {:.2}) hp={:.2}",
                unit.id(),
                unit.side(),
                p.x,
                p.y,
                unit.hp()
            );
        }
        if let Some(outcome) = phase.outcome() {
            let _ = writeln!(out, "*** {} ***", outcome.banner());
        }
        out
    }
}
