//! Orthographic camera over the simulation extent.

use glam::{Mat4, Vec2};

use crate::core::types::Bounds;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub center: Vec2,
    pub zoom: f32,           // World units per screen pixel (lower = zoomed in)
    pub viewport_size: Vec2, // Screen dimensions in pixels
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
            viewport_size: Vec2::new(600.0, 400.0),
        }
    }
}

impl CameraState {
    /// Camera showing exactly `bounds` in a viewport of the same size
    pub fn fit(bounds: &Bounds) -> Self {
        let (cx, cy) = bounds.center();
        Self {
            center: Vec2::new(cx, cy),
            zoom: 1.0,
            viewport_size: Vec2::new(bounds.width(), bounds.height()),
        }
    }

    /// Orthographic view-projection matrix mapping the visible world to clip space.
    pub fn view_projection_matrix(&self) -> Mat4 {
        let half_width = self.viewport_size.x * self.zoom / 2.0;
        let half_height = self.viewport_size.y * self.zoom / 2.0;

        Mat4::orthographic_rh(
            self.center.x - half_width,
            self.center.x + half_width,
            self.center.y - half_height,
            self.center.y + half_height,
            0.0,
            1000.0,
        )
    }
}
