//! Display constants shared by the visual layer and the chart.
//!
//! These are presentation choices, not simulation parameters: changing them
//! alters how a run looks, never how it evolves.

/// Default canvas size in world units (one raster pixel per unit)
pub const CANVAS_WIDTH: u16 = 600;
pub const CANVAS_HEIGHT: u16 = 400;

/// Canvas clear color behind the background raster
pub const CLEAR_COLOR: u32 = 0xFAFAFA;

/// Chart strip height in pixels
pub const CHART_HEIGHT: u32 = 50;

/// Person circle radius in world units
pub const PERSON_RADIUS: f32 = 4.0;

/// Mask ring geometry: (inner radius, outer radius, line width)
pub const REGULAR_MASK_RING: (f32, f32, f32) = (4.0, 5.0, 1.0);
pub const N95_MASK_RING: (f32, f32, f32) = (4.0, 6.0, 4.0);
pub const MASK_RING_COLOR: u32 = 0x333333;

/// Household supply meter: bar width and inset from the left wall
pub const SUPPLY_METER_WIDTH: f32 = 2.0;
pub const SUPPLY_METER_INSET: f32 = 1.0;
pub const SUPPLY_METER_COLOR: u32 = 0x333333;

/// Offset of the "1x"/"2x" household label from the bottom-left corner
pub const HOUSEHOLD_LABEL_OFFSET: (f32, f32) = (5.0, 2.0);

/// Number of frames kept by the rolling frame metrics
pub const METRICS_WINDOW: usize = 120;

/// Chart sampling period used when a preset does not override it
pub const DEFAULT_CHART_PERIOD_TICKS: u64 = 30;
