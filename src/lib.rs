//! Outbreak Viz - playback and visualization controller for tick-based
//! epidemic simulations.
//!
//! An external engine advances the population one tick at a time; this
//! crate drives it frame by frame, keeps one persistent visual per person,
//! projects the contamination field into a reusable raster and maintains
//! a rolling stacked chart of the population by disease status.

pub mod chart;
pub mod core;
pub mod engine;
pub mod playback;
pub mod render;
pub mod visual;

pub use crate::core::config::SimulationConfig;
pub use crate::core::error::{PresentationError, Result, VizError};
pub use crate::playback::{PlaybackState, Simulation, Stage};
