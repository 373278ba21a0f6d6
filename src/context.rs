//! Host framework boundary
//!
//! A planning framework drives this crate through a context object with
//! a `solve`/`clear`/`terminate` lifecycle. The context maps internal
//! error kinds onto a flat status the host can report, and measures
//! planning time around the blocking solve.

use crate::engine::PlanningEngine;
use crate::error::PlanError;
use crate::goal::{NoPlanReason, PlanOutcome};
use crate::interface::{PlannerInterface, SolveRequest};
use crate::types::Solution;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

/// Host-facing status of one planning attempt
#[derive(Debug, Clone, PartialEq)]
pub enum PlanStatus {
    Success,
    /// Attempted and exhausted without a path
    NoSolution,
    /// Attempted, engine stopped at the timeout
    TimedOut,
    /// Could not be attempted
    Failed(String),
}

impl PlanStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, PlanStatus::Success)
    }
}

/// Host-facing response of one planning attempt
#[derive(Debug, Clone)]
pub struct PlanResponse {
    pub solution: Option<Solution>,
    pub planning_time: Duration,
    pub status: PlanStatus,
}

/// One planning attempt's lifecycle as the host framework sees it
pub struct PlanningContext<E: PlanningEngine> {
    interface: Arc<PlannerInterface<E>>,
    request: Mutex<Option<SolveRequest>>,
}

impl<E: PlanningEngine> PlanningContext<E> {
    pub fn new(interface: Arc<PlannerInterface<E>>) -> Self {
        Self {
            interface,
            request: Mutex::new(None),
        }
    }

    /// Stage the request for the next `solve`
    pub fn set_request(&self, request: SolveRequest) {
        if let Ok(mut slot) = self.request.lock() {
            *slot = Some(request);
        }
    }

    /// Run the staged request and translate the result for the host
    pub fn solve(&self) -> PlanResponse {
        let request = match self.request.lock() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        let Some(request) = request else {
            return PlanResponse {
                solution: None,
                planning_time: Duration::ZERO,
                status: PlanStatus::Failed("no planning request staged".into()),
            };
        };

        let started = Instant::now();
        let result = self.interface.solve(&request);
        let planning_time = started.elapsed();

        let (solution, status) = match result {
            Ok(PlanOutcome::Solved(solution)) => (Some(solution), PlanStatus::Success),
            Ok(PlanOutcome::NoSolution(NoPlanReason::Exhausted)) => {
                (None, PlanStatus::NoSolution)
            }
            Ok(PlanOutcome::NoSolution(NoPlanReason::Timeout)) => (None, PlanStatus::TimedOut),
            Err(e) => (None, PlanStatus::Failed(status_description(&e))),
        };
        PlanResponse {
            solution,
            planning_time,
            status,
        }
    }

    /// Drop the staged request
    pub fn clear(&self) {
        if let Ok(mut slot) = self.request.lock() {
            *slot = None;
        }
    }

    /// Attempt to abort an in-progress solve.
    ///
    /// The engine honors its timeout internally and offers no mid-call
    /// cancellation, so this always reports failure to terminate.
    pub fn terminate(&self) -> bool {
        warn!("terminate requested, but the engine does not support cancellation");
        false
    }
}

fn status_description(error: &PlanError) -> String {
    error.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use crate::goal::Goal;
    use crate::occupancy::OccupancyData;
    use crate::types::{ResultFormat, RoadmapSpec};

    fn ready_interface() -> Arc<PlannerInterface<MockEngine>> {
        let interface = PlannerInterface::new(MockEngine::new(10));
        interface
            .register_roadmap(RoadmapSpec {
                name: "a".into(),
                graph_file: "maps/a.rm".into(),
                occupancy_file: "maps/a.og".into(),
                transform_file: "maps/a.tf".into(),
            })
            .unwrap();
        assert!(interface.initialize());
        Arc::new(interface)
    }

    fn request() -> SolveRequest {
        SolveRequest {
            roadmap: "a".into(),
            start_state: 0,
            goal: Goal::StateIds(vec![5]),
            occupancy: OccupancyData::new(),
            timeout: Duration::from_secs(1),
            format: ResultFormat::JointPath,
        }
    }

    #[test]
    fn test_solve_without_request_fails() {
        let context = PlanningContext::new(ready_interface());
        let response = context.solve();
        assert!(matches!(response.status, PlanStatus::Failed(_)));
        assert!(response.solution.is_none());
    }

    #[test]
    fn test_staged_request_produces_solution() {
        let context = PlanningContext::new(ready_interface());
        context.set_request(request());
        let response = context.solve();
        assert!(response.status.is_success());
        assert!(response.solution.is_some());
    }

    #[test]
    fn test_clear_drops_staged_request() {
        let context = PlanningContext::new(ready_interface());
        context.set_request(request());
        context.clear();
        assert!(!context.solve().status.is_success());
    }

    #[test]
    fn test_terminate_reports_unsupported() {
        let context = PlanningContext::new(ready_interface());
        assert!(!context.terminate());
    }

    #[test]
    fn test_unknown_roadmap_maps_to_failed_status() {
        let context = PlanningContext::new(ready_interface());
        let mut req = request();
        req.roadmap = "missing".into();
        context.set_request(req);
        match context.solve().status {
            PlanStatus::Failed(description) => assert!(description.contains("missing")),
            other => panic!("unexpected status: {other:?}"),
        }
    }
}
