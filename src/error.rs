//! Error types for SetuPlan

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PlanError>;

/// SetuPlan error types
///
/// An unsolvable planning request is not an error: the engine reporting
/// "no path" or "timed out" surfaces as [`crate::goal::PlanOutcome::NoSolution`].
/// These variants cover requests that could not be attempted at all.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Roadmap name was never registered
    #[error("unknown roadmap: {0}")]
    RoadmapNotFound(String),

    /// Roadmap name re-registered with different files
    #[error("roadmap '{0}' already registered with different files")]
    RoadmapConflict(String),

    /// Goal specification failed validation
    #[error("invalid goal: {0}")]
    InvalidGoal(String),

    /// Occupancy entry outside the active grid extents
    #[error("occupancy voxel ({x:.3}, {y:.3}, {z:.3}) outside grid extents")]
    OutOfBounds { x: f32, y: f32, z: f32 },

    /// Engine failed to initialize, or a call was attempted after disablement
    #[error("planning engine disabled")]
    EngineDisabled,

    /// Engine rejected or failed a roadmap load
    #[error("roadmap load failed: {0}")]
    LoadFailure(String),

    /// Opaque fault reported by the engine during a call
    #[error("engine error: {0}")]
    Engine(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PlanError {
    fn from(e: toml::de::Error) -> Self {
        PlanError::Config(e.to_string())
    }
}
