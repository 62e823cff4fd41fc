//! Persistent visual objects kept in sync with engine state.
//!
//! Everything here is allocated once per (re)initialization and mutated in
//! place every frame. Sinks only ever see shared borrows.

pub mod field;
pub mod households;
pub mod registry;

pub use field::{ColorRamp, Raster, ScalarFieldProjector, PARTICLE_RAMP};
pub use households::{HouseholdLabel, HouseholdMeters, HouseholdVisual, SupplyMeter};
pub use registry::{EntityRegistry, MaskRing, VisualEntity};
