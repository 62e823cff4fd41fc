use thiserror::Error;

use crate::core::types::{PersonId, SimulationId, Tick};

#[derive(Error, Debug)]
pub enum VizError {
    #[error("Invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Engine failed to create a world: {0}")]
    EngineCreation(String),

    #[error("Engine handle was released and not replaced")]
    EngineDetached,

    #[error("Engine returned tick {got} after tick {previous}")]
    TickOutOfOrder { previous: Tick, got: Tick },

    #[error("Person {0:?} is not in the visual registry")]
    UnknownEntity(PersonId),

    #[error("Person {0:?} appears more than once in one state")]
    DuplicateEntity(PersonId),

    #[error("Person {0:?} is registered but missing from the engine state")]
    MissingEntity(PersonId),

    #[error("Unknown disease status: {0}")]
    UnknownStatus(String),

    #[error("Expected {expected} households, engine reported {got}")]
    HouseholdCountMismatch { expected: usize, got: usize },

    #[error("Scalar field has {got} cells, raster expects {expected}")]
    FieldSizeMismatch { expected: usize, got: usize },

    #[error("Speed must be at least 1 tick per frame, got {0}")]
    InvalidSpeed(u32),

    #[error("Simulation not found: {0:?}")]
    SimulationNotFound(SimulationId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl VizError {
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Engine state disagreed with what the visual layer was built from.
    pub fn is_consistency(&self) -> bool {
        matches!(
            self,
            Self::TickOutOfOrder { .. }
                | Self::UnknownEntity(_)
                | Self::DuplicateEntity(_)
                | Self::MissingEntity(_)
                | Self::HouseholdCountMismatch { .. }
                | Self::FieldSizeMismatch { .. }
        )
    }
}

/// Failure inside a rendering or chart sink. Never halts stepping.
#[derive(Error, Debug)]
pub enum PresentationError {
    #[error("Render backend error: {0}")]
    Render(String),

    #[error("Chart widget error: {0}")]
    Chart(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
