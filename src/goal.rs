//! Goal resolution and result interpretation
//!
//! A goal arrives in one of two shapes: explicit target states, or a tool
//! pose the engine searches for itself. Structural validity (signs,
//! emptiness) can be checked before any roadmap is staged; state-id
//! bounds need the loaded roadmap's state count and are checked at
//! resolve time. Result interpretation is deliberately thin: when the
//! engine ranks multiple pose candidates, its order is authoritative and
//! passes through untouched.

use crate::engine::{EngineGoal, RawPlanResult};
use crate::error::{PlanError, Result};
use crate::types::{ResultFormat, Solution, StateId, ToolPose};

/// Goal specification for one planning request
#[derive(Debug, Clone, PartialEq)]
pub enum Goal {
    /// Ordered target states in the roadmap, non-empty
    StateIds(Vec<StateId>),
    /// Target end-effector pose with per-axis acceptance tolerance and
    /// per-axis ranking weights (a zero weight disables that axis)
    ToolPose {
        target: ToolPose,
        tolerance: ToolPose,
        weights: ToolPose,
    },
}

impl Goal {
    /// Structural checks that need no roadmap: list emptiness, tolerance
    /// and weight signs
    pub fn validate(&self) -> Result<()> {
        match self {
            Goal::StateIds(ids) => {
                if ids.is_empty() {
                    return Err(PlanError::InvalidGoal("empty target state list".into()));
                }
                Ok(())
            }
            Goal::ToolPose {
                tolerance, weights, ..
            } => {
                if tolerance.as_array().iter().any(|&t| t < 0.0) {
                    return Err(PlanError::InvalidGoal(
                        "negative tolerance component".into(),
                    ));
                }
                if weights.as_array().iter().any(|&w| w < 0.0) {
                    return Err(PlanError::InvalidGoal("negative weight component".into()));
                }
                if weights.as_array().iter().all(|&w| w == 0.0) {
                    return Err(PlanError::InvalidGoal(
                        "all weight components are zero".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Reason the engine came back without a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPlanReason {
    /// Search exhausted, no valid path exists under the given occupancy
    Exhausted,
    /// Engine stopped at the requested timeout
    Timeout,
}

/// Outcome of an attempted solve: a negative answer is a normal result,
/// distinct from requests that could not be attempted (those are errors)
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Solved(Solution),
    NoSolution(NoPlanReason),
}

impl PlanOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            PlanOutcome::Solved(solution) => Some(solution),
            PlanOutcome::NoSolution(_) => None,
        }
    }
}

/// Normalize a goal into the engine's request form.
///
/// `num_states` is the state count of the loaded roadmap; every explicit
/// target id must index into it.
pub fn resolve(goal: &Goal, num_states: usize) -> Result<EngineGoal> {
    goal.validate()?;
    match goal {
        Goal::StateIds(ids) => {
            if let Some(&bad) = ids.iter().find(|&&id| id >= num_states) {
                return Err(PlanError::InvalidGoal(format!(
                    "state id {bad} out of range (roadmap has {num_states} states)"
                )));
            }
            Ok(EngineGoal::StateIds(ids.clone()))
        }
        Goal::ToolPose {
            target,
            tolerance,
            weights,
        } => Ok(EngineGoal::PoseSearch {
            target: *target,
            tolerance: *tolerance,
            weights: *weights,
        }),
    }
}

/// Classify a raw engine result against the requested shape.
///
/// A shape mismatch means the engine violated its contract and surfaces
/// as an engine fault, not as a planning failure.
pub fn interpret(raw: RawPlanResult, format: ResultFormat) -> Result<PlanOutcome> {
    match (raw, format) {
        (RawPlanResult::NoSolution, _) => Ok(PlanOutcome::NoSolution(NoPlanReason::Exhausted)),
        (RawPlanResult::Timeout, _) => Ok(PlanOutcome::NoSolution(NoPlanReason::Timeout)),
        (RawPlanResult::Path(configs), ResultFormat::JointPath) => {
            Ok(PlanOutcome::Solved(Solution::Path(configs)))
        }
        (
            RawPlanResult::Traversal {
                states,
                waypoints,
                edges,
            },
            ResultFormat::RoadmapPath,
        ) => Ok(PlanOutcome::Solved(Solution::Traversal {
            states,
            waypoints,
            edges,
        })),
        (raw, format) => Err(PlanError::Engine(format!(
            "engine returned {raw:?} for requested format {format:?}"
        ))),
    }
}
