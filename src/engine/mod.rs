//! Planning engine abstraction
//!
//! The external roadmap solver is reached through exactly one trait,
//! [`PlanningEngine`]. The engine is opaque: it performs its own graph
//! search, collision checking against the supplied voxel grid, and its
//! own ranking of pose-search candidates. This crate never reorders or
//! reinterprets what the engine returns.

pub mod mock;

use crate::error::Result;
use crate::occupancy::VoxelGrid;
use crate::types::{
    Edge, JointConfig, ResultFormat, RoadmapHandle, RoadmapSpec, SlotIndex, StateId, ToolPose,
};
use std::time::Duration;

/// Goal in the validated form the engine accepts
#[derive(Debug, Clone, PartialEq)]
pub enum EngineGoal {
    /// Explicit target states (each already bounds-checked)
    StateIds(Vec<StateId>),
    /// Pose search: the engine finds and ranks acceptable states itself
    PoseSearch {
        target: ToolPose,
        tolerance: ToolPose,
        weights: ToolPose,
    },
}

/// One blocking solve call
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Slot of the roadmap to plan on (must be the loaded one)
    pub slot: SlotIndex,
    /// Start state within that roadmap
    pub start_state: StateId,
    pub goal: EngineGoal,
    /// Dense obstacle volume for this call
    pub grid: VoxelGrid,
    /// Advisory timeout, honored inside the engine
    pub timeout: Duration,
    /// Result shape to produce
    pub format: ResultFormat,
}

/// Raw engine result of one solve call.
///
/// `NoSolution` and `Timeout` are successful calls with a negative
/// answer, not faults; engine faults come back as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPlanResult {
    /// Dense joint-space path
    Path(Vec<JointConfig>),
    /// Roadmap traversal result
    Traversal {
        states: Vec<JointConfig>,
        waypoints: Vec<StateId>,
        edges: Vec<usize>,
    },
    /// Search exhausted without a valid path
    NoSolution,
    /// Engine gave up at the requested timeout
    Timeout,
}

/// Hardware abstraction for the external roadmap planner.
///
/// Implementations are not required to be reentrant: the device session
/// guarantees that no two calls on one engine overlap. The engine
/// manages its own roadmap storage; `load_roadmap` stages a roadmap and
/// returns the slot it now occupies, implicitly replacing whatever held
/// that slot before.
pub trait PlanningEngine: Send {
    /// Start the engine, called exactly once before any other method
    fn init(&mut self) -> Result<()>;

    /// Stage a roadmap's graph/occupancy/transform files on the device
    fn load_roadmap(&mut self, spec: &RoadmapSpec) -> Result<RoadmapHandle>;

    /// Run one blocking planning attempt
    fn plan(&mut self, request: &PlanRequest) -> Result<RawPlanResult>;

    /// Configs of the roadmap in the given slot
    fn roadmap_configs(&self, slot: SlotIndex) -> Result<Vec<JointConfig>>;

    /// Edges of the roadmap in the given slot
    fn roadmap_edges(&self, slot: SlotIndex) -> Result<Vec<Edge>>;

    /// Tool transforms of the roadmap in the given slot
    fn roadmap_transforms(&self, slot: SlotIndex) -> Result<Vec<ToolPose>>;
}
