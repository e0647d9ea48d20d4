use castlefront_common::UnitId;
use castlefront_input::{Action, FieldBounds, InputMapper, Key};
use castlefront_kernel::{Battlefield, MatchEvent, MatchPhase};
use castlefront_render::{RenderView, Renderer};
use glam::Vec2;

use crate::clock::FrameClock;
use crate::timer::FrameTimer;

/// What one host callback produced.
#[derive(Debug)]
pub struct Frame<O> {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Phase evaluated at the start of the frame.
    pub phase: MatchPhase,
    /// Whether the simulation advanced this frame.
    pub stepped: bool,
    /// Renderer output for the post-step state.
    pub output: O,
    /// Events the battlefield logged during this frame.
    pub events: Vec<MatchEvent>,
}

/// Result of applying an input action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Spawned(UnitId),
    /// A spawn was asked for but that side's castle has fallen.
    SpawnRefused,
    Restarted,
    ViewChanged,
    /// Not a match action; the host decides (inspector toggle, quit).
    Host(Action),
    Ignored,
}

/// Owns the battlefield and runs it one host callback at a time.
pub struct FrameDriver<R: Renderer> {
    battlefield: Battlefield,
    renderer: R,
    view: RenderView,
    clock: FrameClock,
    timer: FrameTimer,
    mapper: InputMapper,
}

impl<R: Renderer> FrameDriver<R> {
    pub fn new(battlefield: Battlefield, renderer: R) -> Self {
        let config = battlefield.config();
        let mapper = InputMapper::new(FieldBounds::new(config.field_width, config.field_height));
        Self {
            battlefield,
            renderer,
            view: RenderView::default(),
            clock: FrameClock::new(),
            timer: FrameTimer::default(),
            mapper,
        }
    }

    /// Replace the frame clock, e.g. with one that caps long frames.
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn view(&self) -> &RenderView {
        &self.view
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// One host callback at `timestamp_ms`: step if the match is live, then render.
    pub fn frame(&mut self, timestamp_ms: f64) -> Frame<R::Output> {
        let dt = self.clock.tick(timestamp_ms);
        self.advance(dt)
    }

    /// One frame with an explicit delta, for hosts that measure time themselves.
    pub fn advance(&mut self, dt: f32) -> Frame<R::Output> {
        self.timer.record(dt);

        let phase = self.battlefield.phase();
        let stepped = phase.is_live() && self.battlefield.step(dt);
        // Render the post-step state so the final blow and its overlay appear together.
        let phase = if stepped { self.battlefield.phase() } else { phase };
        let output = self.renderer.render(&self.battlefield, phase, &self.view);
        tracing::trace!(dt, stepped, ?phase, "frame");

        Frame {
            dt,
            phase,
            stepped,
            output,
            events: self.battlefield.drain_events(),
        }
    }

    /// Map a pointer press at a field coordinate and apply it.
    pub fn pointer_press(&mut self, position: Vec2) -> ActionResult {
        let action = self.mapper.pointer_press(position);
        self.apply(action)
    }

    /// Map a key press and apply it.
    pub fn key_press(&mut self, key: Key) -> ActionResult {
        let action = self.mapper.key_press(key);
        self.apply(action)
    }

    pub fn apply(&mut self, action: Action) -> ActionResult {
        match action {
            Action::SpawnUnit(side) => match self.battlefield.request_spawn(side) {
                Some(id) => ActionResult::Spawned(id),
                None => ActionResult::SpawnRefused,
            },
            Action::Restart => {
                self.battlefield.reset();
                // The new match starts on the next frame with dt = 0.
                self.clock.restart();
                ActionResult::Restarted
            }
            Action::ToggleGrid => {
                self.view.show_grid = !self.view.show_grid;
                ActionResult::ViewChanged
            }
            Action::ToggleInspector | Action::Quit => ActionResult::Host(action),
            Action::Noop => ActionResult::Ignored,
        }
    }
}
