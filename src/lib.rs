//! SetuPlan - Thread-safe bridge to a hardware roadmap planner
//!
//! This library adapts a hardware-accelerated roadmap motion planner to a
//! generic motion-planning framework. The planning device holds exactly
//! one precomputed roadmap at a time and its engine handle is not safe
//! for concurrent use, so the crate serializes everything behind one
//! facade: it decides which roadmap is resident, translates caller
//! obstacle data into the engine's dense voxel grid, validates goals,
//! runs the blocking solve, and classifies the result.
//!
//! ## Architecture
//!
//! - [`registry`]: roadmap name → file specification, plus device slot
//!   assignments
//! - [`session`]: the engine handle and the capacity-1 roadmap cache
//! - [`goal`]: goal validation/normalization and result interpretation
//! - [`occupancy`]: sparse occupancy updates → dense voxel grid
//! - [`interface`]: the public facade composing the above under one lock
//! - [`engine`]: the [`engine::PlanningEngine`] seam to the external
//!   solver, with a shipped mock for hardware-free testing
//! - [`context`]: solve/clear/terminate lifecycle for the host framework

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod goal;
pub mod interface;
pub mod occupancy;
pub mod registry;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::PlannerConfig;
pub use context::{PlanResponse, PlanStatus, PlanningContext};
pub use engine::{EngineGoal, PlanRequest, PlanningEngine, RawPlanResult};
pub use error::{PlanError, Result};
pub use goal::{Goal, NoPlanReason, PlanOutcome};
pub use interface::{PlannerInterface, SolveRequest};
pub use occupancy::{OccupancyData, VoxelGrid, VoxelState};
pub use types::{
    Edge, GridMetadata, JointConfig, ResultFormat, RoadmapHandle, RoadmapSpec, SlotIndex, Solution,
    StateId, ToolPose,
};
