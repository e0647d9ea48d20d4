use glam::{Mat4, Vec2};

/// Orthographic camera that fits the whole field into the surface.
///
/// The field keeps its aspect ratio; spare surface space becomes bars on
/// either side. Camera state is presentation only and lives outside the kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCamera {
    field: Vec2,
    surface: Vec2,
}

impl FieldCamera {
    pub fn new(field: Vec2, surface_width: u32, surface_height: u32) -> Self {
        Self {
            field,
            surface: Self::surface_vec(surface_width, surface_height),
        }
    }

    pub fn resize(&mut self, surface_width: u32, surface_height: u32) {
        self.surface = Self::surface_vec(surface_width, surface_height);
    }

    /// Surface pixels per field unit.
    pub fn scale(&self) -> f32 {
        (self.surface.x / self.field.x).min(self.surface.y / self.field.y)
    }

    /// Surface-pixel offset of the field's top-left corner.
    pub fn offset(&self) -> Vec2 {
        (self.surface - self.field * self.scale()) / 2.0
    }

    /// Surface pixel to field coordinate.
    pub fn screen_to_field(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset()) / self.scale()
    }

    /// Field coordinate to surface pixel.
    pub fn field_to_screen(&self, field: Vec2) -> Vec2 {
        field * self.scale() + self.offset()
    }

    /// Field coordinates to clip space, y flipped so the field's top is up.
    pub fn view_projection(&self) -> Mat4 {
        let scale = self.scale();
        let top_left = -self.offset() / scale;
        let bottom_right = top_left + self.surface / scale;
        Mat4::orthographic_rh(top_left.x, bottom_right.x, bottom_right.y, top_left.y, -1.0, 1.0)
    }

    fn surface_vec(width: u32, height: u32) -> Vec2 {
        Vec2::new(width.max(1) as f32, height.max(1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn exact_fit_has_unit_scale() {
        let cam = FieldCamera::new(Vec2::new(800.0, 600.0), 800, 600);
        assert_eq!(cam.scale(), 1.0);
        assert_eq!(cam.offset(), Vec2::ZERO);
        assert_eq!(cam.screen_to_field(Vec2::new(10.0, 20.0)), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn wide_window_letterboxes_horizontally() {
        let cam = FieldCamera::new(Vec2::new(800.0, 600.0), 1600, 600);
        assert_eq!(cam.scale(), 1.0);
        assert_eq!(cam.offset(), Vec2::new(400.0, 0.0));
        assert_eq!(cam.screen_to_field(Vec2::new(400.0, 0.0)), Vec2::ZERO);
    }

    #[test]
    fn screen_field_round_trip() {
        let cam = FieldCamera::new(Vec2::new(800.0, 600.0), 1280, 720);
        let p = Vec2::new(123.0, 456.0);
        let back = cam.screen_to_field(cam.field_to_screen(p));
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn projection_maps_field_corners_to_clip_corners() {
        let cam = FieldCamera::new(Vec2::new(800.0, 600.0), 800, 600);
        let vp = cam.view_projection();
        let top_left = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = vp * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-5 && (top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5 && (bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_sized_surface_is_safe() {
        let mut cam = FieldCamera::new(Vec2::new(800.0, 600.0), 0, 0);
        assert!(cam.scale() > 0.0);
        cam.resize(1024, 768);
        assert!(!cam.view_projection().col(0).x.is_nan());
    }
}
