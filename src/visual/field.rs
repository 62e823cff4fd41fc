//! Scalar field projection into an RGB raster.
//!
//! The raster is allocated once per initialization and rewritten in place
//! every frame; the backend uploads it as the scene background.

use crate::core::error::{Result, VizError};
use crate::engine::FieldView;

/// Piecewise-linear ramp: `channel = base + slope * value`, clamped to a byte
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRamp {
    pub base: [f32; 3],
    pub slope: [f32; 3],
}

/// Off-white that reddens as contamination rises
pub const PARTICLE_RAMP: ColorRamp = ColorRamp {
    base: [250.0, 250.0, 250.0],
    slope: [1.0, -8.0, -8.0],
};

impl ColorRamp {
    /// Color of one cell. NaN reads as an empty cell.
    #[inline]
    pub fn map(&self, value: f32) -> [u8; 3] {
        let v = if value.is_nan() { 0.0 } else { value };
        let channel = |i: usize| (self.base[i] + self.slope[i] * v).clamp(0.0, 255.0) as u8;
        [channel(0), channel(1), channel(2)]
    }

    /// Color of an empty field
    pub fn baseline(&self) -> [u8; 3] {
        self.map(0.0)
    }
}

/// Interleaved RGB8 image, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Raster {
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    fn fill(&mut self, rgb: [u8; 3]) {
        for px in self.data.chunks_exact_mut(3) {
            px.copy_from_slice(&rgb);
        }
    }
}

/// Owns the background raster and projects engine fields into it
#[derive(Debug)]
pub struct ScalarFieldProjector {
    ramp: ColorRamp,
    raster: Raster,
    dirty: bool,
}

impl ScalarFieldProjector {
    pub fn new(width: usize, height: usize, ramp: ColorRamp) -> Self {
        Self {
            ramp,
            raster: Raster::filled(width, height, ramp.baseline()),
            dirty: true,
        }
    }

    /// Back to the empty-field color without reallocating
    pub fn reset(&mut self) {
        self.raster.fill(self.ramp.baseline());
        self.dirty = true;
    }

    /// Rewrite the raster from `field`, which must match its dimensions
    pub fn project(&mut self, field: FieldView<'_>) -> Result<()> {
        let expected = self.raster.width * self.raster.height;
        if field.values.len() != expected || field.cell_count() != expected {
            return Err(VizError::FieldSizeMismatch {
                expected,
                got: field.values.len(),
            });
        }
        for (px, &value) in self.raster.data.chunks_exact_mut(3).zip(field.values) {
            px.copy_from_slice(&self.ramp.map(value));
        }
        self.dirty = true;
        Ok(())
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Whether the raster changed since the last call; clears the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_values() {
        assert_eq!(PARTICLE_RAMP.map(0.0), [250, 250, 250]);
        assert_eq!(PARTICLE_RAMP.map(2.0), [252, 234, 234]);
        // red saturates, green/blue floor at zero
        assert_eq!(PARTICLE_RAMP.map(40.0), [255, 0, 0]);
    }

    #[test]
    fn test_ramp_clamps_bad_input() {
        assert_eq!(PARTICLE_RAMP.map(f32::NAN), [250, 250, 250]);
        assert_eq!(PARTICLE_RAMP.map(-10.0), [240, 255, 255]);
        assert_eq!(PARTICLE_RAMP.map(f32::INFINITY), [255, 0, 0]);
        assert_eq!(PARTICLE_RAMP.map(f32::NEG_INFINITY), [0, 255, 255]);
    }

    #[test]
    fn test_project_reuses_buffer() {
        let mut projector = ScalarFieldProjector::new(2, 2, PARTICLE_RAMP);
        let ptr = projector.raster().data.as_ptr();
        let values = [0.0, 1.0, 5.0, f32::NAN];
        projector.project(FieldView::new(2, 2, &values)).unwrap();
        assert_eq!(projector.raster().data.as_ptr(), ptr);
        assert_eq!(projector.raster().pixel(1, 0), [251, 242, 242]);
        assert_eq!(projector.raster().pixel(0, 1), [255, 210, 210]);
        assert_eq!(projector.raster().pixel(1, 1), [250, 250, 250]);
    }

    #[test]
    fn test_project_rejects_wrong_size() {
        let mut projector = ScalarFieldProjector::new(3, 2, PARTICLE_RAMP);
        let values = [0.0; 5];
        assert!(matches!(
            projector.project(FieldView::new(5, 1, &values)),
            Err(VizError::FieldSizeMismatch { expected: 6, got: 5 })
        ));
    }

    #[test]
    fn test_reset_restores_baseline_and_marks_dirty() {
        let mut projector = ScalarFieldProjector::new(1, 1, PARTICLE_RAMP);
        assert!(projector.take_dirty());
        projector.project(FieldView::new(1, 1, &[30.0])).unwrap();
        assert_eq!(projector.raster().pixel(0, 0), [255, 10, 10]);
        projector.take_dirty();
        projector.reset();
        assert!(projector.take_dirty());
        assert!(!projector.take_dirty());
        assert_eq!(projector.raster().pixel(0, 0), [250, 250, 250]);
    }
}
