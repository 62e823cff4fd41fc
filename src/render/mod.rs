//! Rendering boundary for the playback controller.
//!
//! Sinks receive a read-only [`SceneFrame`] borrowed from a simulation
//! instance once per frame. They never mutate simulation state.

pub mod camera;
pub mod colors;
pub mod instance;
pub mod metrics;

pub use camera::CameraState;
pub use colors::{status_color, Color};
pub use instance::{ShapeInstance, ShapeType};
pub use metrics::FrameMetrics;

use crate::core::constants::{MASK_RING_COLOR, SUPPLY_METER_COLOR};
use crate::core::error::PresentationError;
use crate::core::types::Tick;
use crate::visual::{EntityRegistry, HouseholdMeters, Raster};

/// Everything a backend needs to draw one frame of one instance
#[derive(Debug, Clone, Copy)]
pub struct SceneFrame<'a> {
    pub tick: Tick,
    pub people: &'a EntityRegistry,
    pub households: &'a HouseholdMeters,
    /// Projected contamination field, present for particle-based spread
    pub background: Option<&'a Raster>,
    /// True when `background` changed since the last frame
    pub background_dirty: bool,
    pub clear_color: Color,
}

/// A rendering backend.
pub trait SceneSink {
    fn draw(&mut self, frame: &SceneFrame<'_>, camera: &CameraState)
        -> Result<(), PresentationError>;
}

/// Sink that draws nothing. Used by the headless runner and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScene;

impl SceneSink for NullScene {
    fn draw(&mut self, _: &SceneFrame<'_>, _: &CameraState) -> Result<(), PresentationError> {
        Ok(())
    }
}

/// Packs the frame into GPU-ready instances.
/// Call this once per frame, passing the same buffer to avoid allocations.
///
/// Order: supply meters, people, mask rings. People keep registry order.
pub fn pack_instances(frame: &SceneFrame<'_>, buffer: &mut Vec<ShapeInstance>) {
    buffer.clear();

    let meter_color = Color::from_hex(SUPPLY_METER_COLOR).to_u32();
    for household in frame.households.iter() {
        if let Some(meter) = household.meter {
            buffer.push(ShapeInstance::new(
                meter.position.to_array(),
                [meter.width, meter.height()],
                meter_color,
                ShapeType::Rect,
            ));
        }
    }

    for (_, visual) in frame.people.iter() {
        buffer.push(ShapeInstance::new(
            visual.position.to_array(),
            [visual.radius, visual.radius],
            visual.color.to_u32(),
            ShapeType::Disc,
        ));
    }

    let ring_color = Color::from_hex(MASK_RING_COLOR).to_u32();
    for (_, visual) in frame.people.iter() {
        if let Some(ring) = visual.mask {
            buffer.push(ShapeInstance::new(
                ring.position.to_array(),
                [ring.inner_radius, ring.outer_radius],
                ring_color,
                ShapeType::Ring,
            ));
        }
    }
}
