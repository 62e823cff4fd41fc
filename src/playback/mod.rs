//! Playback: per-instance scheduling and the page-level coordinator.

pub mod simulation;
pub mod stage;

pub use simulation::{FrameReport, PlaybackState, Simulation};
pub use stage::{FrameSummary, Stage};
