//! Color definitions for disease states and overlays

use crate::engine::state::DiseaseStatus;

/// RGBA color (0.0 to 1.0 per channel)
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

    /// Opaque color from a 0xRRGGBB literal
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Pack color into u32 (RGBA8 format).
    pub fn to_u32(&self) -> u32 {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u32;
        let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u32;
        (r << 24) | (g << 16) | (b << 8) | a
    }

    /// Back to a 0xRRGGBB literal, dropping alpha
    pub fn to_hex(&self) -> u32 {
        self.to_u32() >> 8
    }
}

// #B8F7BF
pub const SUSCEPTIBLE: Color = Color::rgba(184.0 / 255.0, 247.0 / 255.0, 191.0 / 255.0, 1.0);
// #C7BA29
pub const EXPOSED: Color = Color::rgba(199.0 / 255.0, 186.0 / 255.0, 41.0 / 255.0, 1.0);
// #EB6383
pub const INFECTIOUS: Color = Color::rgba(235.0 / 255.0, 99.0 / 255.0, 131.0 / 255.0, 1.0);
// #C8C8C8
pub const RECOVERED: Color = Color::rgba(200.0 / 255.0, 200.0 / 255.0, 200.0 / 255.0, 1.0);

/// Fill color for a person in the given disease state
pub fn status_color(status: DiseaseStatus) -> Color {
    match status {
        DiseaseStatus::Susceptible => SUSCEPTIBLE,
        DiseaseStatus::Exposed => EXPOSED,
        DiseaseStatus::Infectious => INFECTIOUS,
        DiseaseStatus::Recovered => RECOVERED,
    }
}
