use castlefront_common::Side;
use glam::Vec2;

use crate::action::{Action, Key};

/// Extents of the playing field in field coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub width: f32,
    pub height: f32,
}

impl FieldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.is_finite()
            && (0.0..self.width).contains(&point.x)
            && (0.0..self.height).contains(&point.y)
    }

    /// Strictly left of the horizontal midpoint.
    pub fn in_player_half(&self, point: Vec2) -> bool {
        self.contains(point) && point.x < self.width / 2.0
    }
}

/// Maps raw presses to actions for one field.
#[derive(Debug, Clone)]
pub struct InputMapper {
    bounds: FieldBounds,
}

impl InputMapper {
    pub fn new(bounds: FieldBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    /// A pointer press at a field coordinate. Only the player's half spawns units.
    pub fn pointer_press(&self, position: Vec2) -> Action {
        if self.bounds.in_player_half(position) {
            Action::SpawnUnit(Side::Player)
        } else {
            tracing::trace!(x = position.x, y = position.y, "press ignored");
            Action::Noop
        }
    }

    pub fn key_press(&self, key: Key) -> Action {
        match key {
            Key::R => Action::Restart,
            Key::G => Action::ToggleGrid,
            Key::F1 => Action::ToggleInspector,
            Key::Escape => Action::Quit,
            Key::Other => Action::Noop,
        }
    }
}
