use bytemuck::{Pod, Zeroable};
use castlefront_render::{Color, DrawCommand, Scene};
use glam::Vec2;

/// Segments used to approximate a circle.
pub const CIRCLE_SEGMENTS: usize = 24;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ColorVertex {
    fn new(position: Vec2, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// Flatten a scene into a triangle list, in paint order.
///
/// `Clear` becomes the pass clear color and `Text` is painted by the UI layer,
/// so neither produces geometry.
pub fn tessellate(scene: &Scene) -> Vec<ColorVertex> {
    let mut out = Vec::new();
    for command in &scene.commands {
        match command {
            DrawCommand::Clear(_) | DrawCommand::Text { .. } => {}
            DrawCommand::Rect { min, size, color } => {
                push_quad(
                    &mut out,
                    [
                        *min,
                        *min + Vec2::new(size.x, 0.0),
                        *min + *size,
                        *min + Vec2::new(0.0, size.y),
                    ],
                    *color,
                );
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                let Some(dir) = (*to - *from).try_normalize() else {
                    continue;
                };
                let half = dir.perp() * (*width / 2.0);
                push_quad(
                    &mut out,
                    [*from - half, *to - half, *to + half, *from + half],
                    *color,
                );
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
                for i in 0..CIRCLE_SEGMENTS {
                    let a0 = step * i as f32;
                    let a1 = step * (i + 1) as f32;
                    out.push(ColorVertex::new(*center, *color));
                    out.push(ColorVertex::new(
                        *center + Vec2::from_angle(a0) * *radius,
                        *color,
                    ));
                    out.push(ColorVertex::new(
                        *center + Vec2::from_angle(a1) * *radius,
                        *color,
                    ));
                }
            }
        }
    }
    out
}

fn push_quad(out: &mut Vec<ColorVertex>, corners: [Vec2; 4], color: Color) {
    for i in [0, 1, 2, 2, 3, 0] {
        out.push(ColorVertex::new(corners[i], color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castlefront_render::palette;

    fn scene(commands: Vec<DrawCommand>) -> Scene {
        Scene { commands }
    }

    #[test]
    fn rect_is_two_triangles() {
        let verts = tessellate(&scene(vec![DrawCommand::Rect {
            min: Vec2::new(10.0, 20.0),
            size: Vec2::new(30.0, 40.0),
            color: palette::PLAYER,
        }]));
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].position, [10.0, 20.0]);
        assert_eq!(verts[2].position, [40.0, 60.0]);
        assert!(verts.iter().all(|v| v.color == palette::PLAYER.to_array()));
    }

    #[test]
    fn circle_is_a_fan() {
        let verts = tessellate(&scene(vec![DrawCommand::Circle {
            center: Vec2::new(100.0, 100.0),
            radius: 8.0,
            color: palette::ENEMY,
        }]));
        assert_eq!(verts.len(), CIRCLE_SEGMENTS * 3);
        for v in verts.iter().skip(1).step_by(3) {
            let d = Vec2::from_array(v.position).distance(Vec2::new(100.0, 100.0));
            assert!((d - 8.0).abs() < 1e-3);
        }
    }

    #[test]
    fn line_has_requested_width() {
        let verts = tessellate(&scene(vec![DrawCommand::Line {
            from: Vec2::new(0.0, 0.0),
            to: Vec2::new(0.0, 100.0),
            width: 2.0,
            color: palette::GRID,
        }]));
        assert_eq!(verts.len(), 6);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0].abs()).collect();
        assert!(xs.iter().all(|x| (*x - 1.0).abs() < 1e-5));
    }

    #[test]
    fn clear_text_and_degenerate_lines_emit_nothing() {
        let verts = tessellate(&scene(vec![
            DrawCommand::Clear(palette::BACKGROUND),
            DrawCommand::Text {
                anchor: Vec2::ZERO,
                text: "you won".into(),
                size: 36.0,
                color: palette::TEXT,
            },
            DrawCommand::Line {
                from: Vec2::ONE,
                to: Vec2::ONE,
                width: 1.0,
                color: palette::GRID,
            },
        ]));
        assert!(verts.is_empty());
    }
}
