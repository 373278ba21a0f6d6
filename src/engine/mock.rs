//! Mock planning engine for hardware-free testing
//!
//! Stands in for the real device the way a simulated robot stands in for
//! hardware: scripted failures, call counters, and an overlap guard that
//! panics if two engine calls ever run concurrently (the real device is
//! not reentrant, so overlap is always a caller bug).

use super::{EngineGoal, PlanRequest, PlanningEngine, RawPlanResult};
use crate::error::{PlanError, Result};
use crate::types::{
    Edge, GridMetadata, JointConfig, ResultFormat, RoadmapHandle, RoadmapSpec, SlotIndex, StateId,
    ToolPose,
};
use nalgebra::Point3;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared call counters, cloneable before the engine is moved into the
/// planner interface
#[derive(Clone, Debug, Default)]
pub struct MockCounters {
    loads: Arc<AtomicUsize>,
    plans: Arc<AtomicUsize>,
}

impl MockCounters {
    /// Number of roadmap load calls issued to the engine
    pub fn load_calls(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of solve calls issued to the engine
    pub fn plan_calls(&self) -> usize {
        self.plans.load(Ordering::SeqCst)
    }
}

/// Mock implementation of [`PlanningEngine`]
#[derive(Debug)]
pub struct MockEngine {
    num_states: usize,
    grid: GridMetadata,
    fail_init: bool,
    fail_load: bool,
    scripted_result: Option<RawPlanResult>,
    plan_delay: Duration,
    counters: MockCounters,
    busy: Arc<AtomicBool>,
    next_slot: SlotIndex,
}

impl MockEngine {
    /// Engine with `num_states` roadmap states and a 1m cube grid at 5cm
    /// resolution, succeeding at everything
    pub fn new(num_states: usize) -> Self {
        Self {
            num_states,
            grid: GridMetadata::new(Point3::origin(), 0.05, [20, 20, 20]),
            fail_init: false,
            fail_load: false,
            scripted_result: None,
            plan_delay: Duration::ZERO,
            counters: MockCounters::default(),
            busy: Arc::new(AtomicBool::new(false)),
            next_slot: 0,
        }
    }

    /// Make `init` fail
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Make every `load_roadmap` fail
    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Report this grid metadata from every load
    pub fn with_grid(mut self, grid: GridMetadata) -> Self {
        self.grid = grid;
        self
    }

    /// Return this raw result from every plan call instead of the
    /// synthesized default
    pub fn with_result(mut self, result: RawPlanResult) -> Self {
        self.scripted_result = Some(result);
        self
    }

    /// Sleep this long inside each plan call (widens the race window for
    /// concurrency tests)
    pub fn with_plan_delay(mut self, delay: Duration) -> Self {
        self.plan_delay = delay;
        self
    }

    /// Counter handles, valid after the engine has been moved away
    pub fn counters(&self) -> MockCounters {
        self.counters.clone()
    }

    fn config_for(state: StateId) -> JointConfig {
        vec![state as f32; 6]
    }

    /// Synthesize a straight start-to-goal result in the requested shape
    fn default_result(&self, request: &PlanRequest) -> RawPlanResult {
        let goal_state = match &request.goal {
            EngineGoal::StateIds(ids) => ids.first().copied().unwrap_or(0),
            EngineGoal::PoseSearch { .. } => 0,
        };
        match request.format {
            ResultFormat::JointPath => RawPlanResult::Path(vec![
                Self::config_for(request.start_state),
                Self::config_for(goal_state),
            ]),
            ResultFormat::RoadmapPath => RawPlanResult::Traversal {
                states: (0..self.num_states).map(Self::config_for).collect(),
                waypoints: vec![request.start_state, goal_state],
                edges: vec![0],
            },
        }
    }
}

/// RAII overlap guard; entering while another call is live is a panic
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn enter(flag: &Arc<AtomicBool>) -> Self {
        assert!(
            !flag.swap(true, Ordering::SeqCst),
            "overlapping mock engine calls"
        );
        Self(flag.clone())
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl PlanningEngine for MockEngine {
    fn init(&mut self) -> Result<()> {
        if self.fail_init {
            return Err(PlanError::Engine("mock init failure".into()));
        }
        Ok(())
    }

    fn load_roadmap(&mut self, spec: &RoadmapSpec) -> Result<RoadmapHandle> {
        let _guard = BusyGuard::enter(&self.busy);
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return Err(PlanError::Engine(format!(
                "mock load failure for '{}'",
                spec.name
            )));
        }
        // slot keys wrap after u16::MAX loads; real devices recycle slots
        let slot = self.next_slot;
        self.next_slot = self.next_slot.wrapping_add(1);
        Ok(RoadmapHandle {
            slot,
            num_states: self.num_states,
            grid: self.grid,
        })
    }

    fn plan(&mut self, request: &PlanRequest) -> Result<RawPlanResult> {
        let _guard = BusyGuard::enter(&self.busy);
        self.counters.plans.fetch_add(1, Ordering::SeqCst);
        if !self.plan_delay.is_zero() {
            std::thread::sleep(self.plan_delay);
        }
        match &self.scripted_result {
            Some(result) => Ok(result.clone()),
            None => Ok(self.default_result(request)),
        }
    }

    fn roadmap_configs(&self, _slot: SlotIndex) -> Result<Vec<JointConfig>> {
        Ok((0..self.num_states).map(Self::config_for).collect())
    }

    fn roadmap_edges(&self, _slot: SlotIndex) -> Result<Vec<Edge>> {
        Ok((1..self.num_states)
            .map(|to| Edge { from: to - 1, to })
            .collect())
    }

    fn roadmap_transforms(&self, _slot: SlotIndex) -> Result<Vec<ToolPose>> {
        Ok((0..self.num_states)
            .map(|s| ToolPose::new(s as f32 * 0.01, 0.0, 0.0, 0.0, 0.0, 0.0))
            .collect())
    }
}
