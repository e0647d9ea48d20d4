use castlefront_common::Side;
use castlefront_kernel::{Battlefield, Castle, MatchPhase};
use glam::Vec2;

use crate::renderer::RenderView;

/// RGBA color with components in `[0, 1]`, written to the target unconverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgba(0.1, 0.1, 0.15, 1.0);
    pub const GRID: Color = Color::rgb8(0x23, 0x23, 0x35);
    pub const PLAYER: Color = Color::rgb8(0x4c, 0xaf, 0x50);
    pub const ENEMY: Color = Color::rgb8(0xf4, 0x43, 0x36);
    pub const HP_BAR_BACK: Color = Color::rgb8(0x33, 0x33, 0x33);
    pub const HP_BAR_FILL: Color = Color::rgb8(0x4c, 0xaf, 0x50);
    pub const OVERLAY: Color = Color::rgba(0.0, 0.0, 0.0, 0.6);
    pub const TEXT: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
}

/// Width of a castle hp bar in field units.
const HP_BAR_WIDTH: f32 = 80.0;
/// Height of a castle hp bar in field units.
const HP_BAR_HEIGHT: f32 = 8.0;
const GRID_LINE_WIDTH: f32 = 1.0;
const BANNER_SIZE: f32 = 36.0;

/// One drawing primitive, in field coordinates (origin top-left, y down).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole target.
    Clear(Color),
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    /// Axis-aligned filled rectangle.
    Rect { min: Vec2, size: Vec2, color: Color },
    /// Filled circle.
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Text centred on `anchor`.
    Text {
        anchor: Vec2,
        text: String,
        size: f32,
        color: Color,
    },
}

/// Ordered draw commands for one frame. Later commands paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// Translate the battlefield into draw commands.
    pub fn build(battlefield: &Battlefield, phase: MatchPhase, view: &RenderView) -> Self {
        let config = battlefield.config();
        let field = config.field_size();
        let mut commands = vec![DrawCommand::Clear(palette::BACKGROUND)];

        if view.show_grid {
            grid_lines(field, config.tile_size, &mut commands);
        }

        for castle in battlefield.castles() {
            castle_commands(
                castle,
                config.tile_size,
                config.castle_max_hp,
                view.show_hp_bars,
                &mut commands,
            );
        }

        for unit in battlefield.all_units() {
            commands.push(DrawCommand::Circle {
                center: unit.position(),
                radius: unit.radius(),
                color: side_color(unit.side()),
            });
        }

        if let Some(outcome) = phase.outcome() {
            commands.push(DrawCommand::Rect {
                min: Vec2::ZERO,
                size: field,
                color: palette::OVERLAY,
            });
            commands.push(DrawCommand::Text {
                anchor: field / 2.0,
                text: outcome.banner().to_string(),
                size: BANNER_SIZE,
                color: palette::TEXT,
            });
        }

        Self { commands }
    }

    /// The background color, if the scene starts with a clear.
    pub fn clear_color(&self) -> Option<Color> {
        match self.commands.first() {
            Some(DrawCommand::Clear(color)) => Some(*color),
            _ => None,
        }
    }

    /// All text commands, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Vec2, f32, Color)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text {
                anchor,
                text,
                size,
                color,
            } => Some((text.as_str(), *anchor, *size, *color)),
            _ => None,
        })
    }
}

fn side_color(side: Side) -> Color {
    match side {
        Side::Player => palette::PLAYER,
        Side::Enemy => palette::ENEMY,
    }
}

fn grid_lines(field: Vec2, spacing: f32, out: &mut Vec<DrawCommand>) {
    let mut x = 0.0;
    while x < field.x {
        out.push(DrawCommand::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, field.y),
            width: GRID_LINE_WIDTH,
            color: palette::GRID,
        });
        x += spacing;
    }
    let mut y = 0.0;
    while y < field.y {
        out.push(DrawCommand::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(field.x, y),
            width: GRID_LINE_WIDTH,
            color: palette::GRID,
        });
        y += spacing;
    }
}

fn castle_commands(
    castle: &Castle,
    tile: f32,
    max_hp: f32,
    show_hp_bar: bool,
    out: &mut Vec<DrawCommand>,
) {
    let center = castle.position();
    out.push(DrawCommand::Rect {
        min: center - Vec2::splat(tile / 2.0),
        size: Vec2::splat(tile),
        color: side_color(castle.side()),
    });

    if !show_hp_bar {
        return;
    }
    let bar_min = Vec2::new(center.x - HP_BAR_WIDTH / 2.0, center.y - tile);
    out.push(DrawCommand::Rect {
        min: bar_min,
        size: Vec2::new(HP_BAR_WIDTH, HP_BAR_HEIGHT),
        color: palette::HP_BAR_BACK,
    });
    out.push(DrawCommand::Rect {
        min: bar_min,
        size: Vec2::new(HP_BAR_WIDTH * castle.hp_ratio(max_hp), HP_BAR_HEIGHT),
        color: palette::HP_BAR_FILL,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use castlefront_kernel::MatchConfig;

    fn circles(scene: &Scene) -> usize {
        scene
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    #[test]
    fn fresh_match_has_grid_castles_and_no_overlay() {
        let field = Battlefield::new(MatchConfig::default()).unwrap();
        let scene = Scene::build(&field, field.phase(), &RenderView::default());

        assert_eq!(scene.clear_color(), Some(palette::BACKGROUND));
        let lines = scene
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        // 800 / 40 vertical + 600 / 40 horizontal
        assert_eq!(lines, 20 + 15);
        assert_eq!(circles(&scene), 0);
        assert_eq!(scene.texts().count(), 0);
    }

    #[test]
    fn units_are_drawn_in_side_colors() {
        let mut field = Battlefield::new(MatchConfig::default()).unwrap();
        field.place_unit(Side::Player, Vec2::new(100.0, 100.0));
        field.place_unit(Side::Enemy, Vec2::new(500.0, 100.0));
        let scene = Scene::build(&field, field.phase(), &RenderView::default());

        assert_eq!(circles(&scene), 2);
        assert!(scene.commands.contains(&DrawCommand::Circle {
            center: Vec2::new(500.0, 100.0),
            radius: 8.0,
            color: palette::ENEMY,
        }));
    }

    #[test]
    fn hp_bar_is_proportional() {
        let config = MatchConfig {
            unit_speed: 0.0,
            ..MatchConfig::default()
        };
        let mut field = Battlefield::new(config).unwrap();
        let castle = field.castle(Side::Enemy).position();
        field.place_unit(Side::Player, castle);
        for _ in 0..5 {
            field.step(1.0);
        }
        // 5 steps of 5 hp/s at dt = 1 leaves 75 hp.
        assert_eq!(field.castle(Side::Enemy).hp(), 75.0);

        let scene = Scene::build(&field, field.phase(), &RenderView::default());
        let fill = Vec2::new(castle.x - 40.0, castle.y - 40.0);
        assert!(scene.commands.contains(&DrawCommand::Rect {
            min: fill,
            size: Vec2::new(60.0, 8.0),
            color: palette::HP_BAR_FILL,
        }));
    }

    #[test]
    fn hidden_grid_and_bars_are_skipped() {
        let field = Battlefield::new(MatchConfig::default()).unwrap();
        let view = RenderView {
            show_grid: false,
            show_hp_bars: false,
        };
        let scene = Scene::build(&field, field.phase(), &view);
        // clear + two castle squares
        assert_eq!(scene.commands.len(), 3);
    }

    #[test]
    fn lost_match_shows_overlay_last() {
        let config = MatchConfig {
            castle_max_hp: 1.0,
            ..MatchConfig::default()
        };
        let mut field = Battlefield::new(config).unwrap();
        let castle = field.castle(Side::Player).position();
        field.place_unit(Side::Enemy, castle);
        field.step(1.0);

        let scene = Scene::build(&field, field.phase(), &RenderView::default());
        let texts: Vec<_> = scene.texts().collect();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].0, "you lost");
        assert_eq!(texts[0].1, Vec2::new(400.0, 300.0));
        assert!(matches!(
            &scene.commands[scene.commands.len() - 2],
            DrawCommand::Rect { color, .. } if *color == palette::OVERLAY
        ));
    }

    #[test]
    fn rgb8_scales_channels() {
        let c = Color::rgb8(255, 0, 51);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.2, 1.0]);
    }
}
