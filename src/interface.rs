//! Planner interface facade
//!
//! The public entry point and the single chokepoint in front of the
//! engine. One mutex guards the registry, the slot assignments, the
//! capacity-1 cache, and the engine handle; every solve holds it from
//! registry lookup through result interpretation, so a solve is one
//! atomic unit and concurrent callers queue behind it (for up to the
//! requested timeout plus reload latency — there is no cancellation and
//! no fairness beyond the mutex's own policy).
//!
//! Lifecycle: `Uninitialized → Ready` on the one successful `initialize`,
//! or `→ Disabled` on failure. `Disabled` is terminal for the instance;
//! later `initialize` calls do not retry the engine.

use crate::config::{PlannerConfig, PlannerSettings};
use crate::engine::{PlanRequest, PlanningEngine};
use crate::error::{PlanError, Result};
use crate::goal::{self, Goal, PlanOutcome};
use crate::occupancy::{self, OccupancyData};
use crate::registry::RoadmapRegistry;
use crate::session::DeviceSession;
use crate::types::{Edge, JointConfig, ResultFormat, RoadmapSpec, StateId, ToolPose};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, error, info};

const UNINITIALIZED: u8 = 0;
const READY: u8 = 1;
const DISABLED: u8 = 2;

/// One planning request through the facade
#[derive(Debug, Clone)]
pub struct SolveRequest {
    /// Registered roadmap to plan on
    pub roadmap: String,
    /// Start state within that roadmap
    pub start_state: StateId,
    pub goal: Goal,
    /// Sparse obstacle updates applied for this call only
    pub occupancy: OccupancyData,
    /// Advisory timeout handed to the engine
    pub timeout: Duration,
    pub format: ResultFormat,
}

#[derive(Debug)]
struct Inner<E: PlanningEngine> {
    registry: RoadmapRegistry,
    session: DeviceSession<E>,
}

/// Thread-safe facade over one shared planning engine
#[derive(Debug)]
pub struct PlannerInterface<E: PlanningEngine> {
    /// Lifecycle state, readable without the session lock
    state: AtomicU8,
    settings: PlannerSettings,
    inner: Mutex<Inner<E>>,
}

impl<E: PlanningEngine> PlannerInterface<E> {
    /// Wrap an engine with default settings and an empty registry
    pub fn new(engine: E) -> Self {
        Self {
            state: AtomicU8::new(UNINITIALIZED),
            settings: PlannerSettings::default(),
            inner: Mutex::new(Inner {
                registry: RoadmapRegistry::new(),
                session: DeviceSession::new(engine),
            }),
        }
    }

    /// Wrap an engine and register every roadmap from the configuration
    pub fn from_config(engine: E, config: &PlannerConfig) -> Result<Self> {
        config.planner.validate()?;
        let mut registry = RoadmapRegistry::new();
        for entry in &config.roadmaps {
            registry.register(entry.to_spec())?;
        }
        info!(roadmaps = registry.len(), "planner configured");
        Ok(Self {
            state: AtomicU8::new(UNINITIALIZED),
            settings: config.planner.clone(),
            inner: Mutex::new(Inner {
                registry,
                session: DeviceSession::new(engine),
            }),
        })
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Start the engine, once.
    ///
    /// Returns `true` iff the interface is ready. A failed attempt
    /// disables the instance permanently; repeated calls after success
    /// or failure just report the standing answer.
    pub fn initialize(&self) -> bool {
        match self.state.load(Ordering::Acquire) {
            READY => return true,
            DISABLED => return false,
            _ => {}
        }
        let Ok(mut inner) = self.inner.lock() else {
            self.state.store(DISABLED, Ordering::Release);
            return false;
        };
        // another caller may have won the race while we waited
        match self.state.load(Ordering::Acquire) {
            READY => return true,
            DISABLED => return false,
            _ => {}
        }
        match inner.session.init() {
            Ok(()) => {
                info!("planning engine initialized");
                self.state.store(READY, Ordering::Release);
                true
            }
            Err(e) => {
                error!(error = %e, "planning engine initialization failed, disabling interface");
                self.state.store(DISABLED, Ordering::Release);
                false
            }
        }
    }

    /// True iff `initialize` succeeded and the engine is usable
    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// Register a roadmap specification.
    ///
    /// Intended for configuration time, before concurrent planning
    /// begins; idempotent for identical specs.
    pub fn register_roadmap(&self, spec: RoadmapSpec) -> Result<()> {
        if self.state.load(Ordering::Acquire) == DISABLED {
            return Err(PlanError::EngineDisabled);
        }
        self.lock()?.registry.register(spec)
    }

    /// Run one planning attempt.
    ///
    /// Blocks while any other caller holds the session; the whole
    /// sequence (lookup, roadmap staging, occupancy translation, goal
    /// resolution, engine call, interpretation) runs under the lock.
    /// Validation failures return before the engine is touched; a
    /// negative engine answer is an `Ok` outcome, not an error.
    pub fn solve(&self, request: &SolveRequest) -> Result<PlanOutcome> {
        self.check_ready()?;
        request.goal.validate()?;

        let mut guard = self.lock()?;
        let inner = &mut *guard;
        let spec = inner.registry.lookup(&request.roadmap)?.clone();
        let handle = inner.session.ensure_loaded(&mut inner.registry, &spec)?;
        let grid = occupancy::to_voxel_grid(&request.occupancy, &handle.grid)?;
        let resolved = goal::resolve(&request.goal, handle.num_states)?;

        if self.settings.debug {
            info!(
                roadmap = %request.roadmap,
                slot = handle.slot,
                states = handle.num_states,
                occupied_voxels = grid.occupied_count(),
                "solve diagnostics"
            );
        }
        debug!(
            roadmap = %request.roadmap,
            start = request.start_state,
            timeout_ms = request.timeout.as_millis() as u64,
            "issuing solve"
        );
        let raw = inner.session.plan(&PlanRequest {
            slot: handle.slot,
            start_state: request.start_state,
            goal: resolved,
            grid,
            timeout: request.timeout,
            format: request.format,
        })?;
        let outcome = goal::interpret(raw, request.format)?;
        match &outcome {
            PlanOutcome::Solved(_) => debug!(roadmap = %request.roadmap, "solution found"),
            PlanOutcome::NoSolution(reason) => {
                info!(roadmap = %request.roadmap, ?reason, "no solution")
            }
        }
        Ok(outcome)
    }

    /// Configs of the named roadmap, staging it if necessary
    pub fn get_roadmap_configs(&self, roadmap: &str) -> Result<Vec<JointConfig>> {
        self.with_loaded(roadmap, |session, slot| session.engine().roadmap_configs(slot))
    }

    /// Edges of the named roadmap, staging it if necessary
    pub fn get_roadmap_edges(&self, roadmap: &str) -> Result<Vec<Edge>> {
        self.with_loaded(roadmap, |session, slot| session.engine().roadmap_edges(slot))
    }

    /// Tool transforms of the named roadmap, staging it if necessary
    pub fn get_roadmap_transforms(&self, roadmap: &str) -> Result<Vec<ToolPose>> {
        self.with_loaded(roadmap, |session, slot| {
            session.engine().roadmap_transforms(slot)
        })
    }

    fn with_loaded<T>(
        &self,
        roadmap: &str,
        read: impl FnOnce(&DeviceSession<E>, crate::types::SlotIndex) -> Result<T>,
    ) -> Result<T> {
        self.check_ready()?;
        let mut guard = self.lock()?;
        let inner = &mut *guard;
        let spec = inner.registry.lookup(roadmap)?.clone();
        let handle = inner.session.ensure_loaded(&mut inner.registry, &spec)?;
        read(&inner.session, handle.slot)
    }

    fn check_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(PlanError::EngineDisabled)
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner<E>>> {
        self.inner
            .lock()
            .map_err(|_| PlanError::Engine("planner session lock poisoned".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;

    fn spec(name: &str) -> RoadmapSpec {
        RoadmapSpec {
            name: name.into(),
            graph_file: format!("maps/{name}.rm"),
            occupancy_file: format!("maps/{name}.og"),
            transform_file: format!("maps/{name}.tf"),
        }
    }

    fn request(roadmap: &str) -> SolveRequest {
        SolveRequest {
            roadmap: roadmap.into(),
            start_state: 0,
            goal: Goal::StateIds(vec![1]),
            occupancy: OccupancyData::new(),
            timeout: Duration::from_secs(1),
            format: ResultFormat::JointPath,
        }
    }

    #[test]
    fn test_solve_before_initialize_is_disabled() {
        let interface = PlannerInterface::new(MockEngine::new(10));
        let err = interface.solve(&request("a")).unwrap_err();
        assert!(matches!(err, PlanError::EngineDisabled));
        assert!(!interface.is_ready());
    }

    #[test]
    fn test_initialize_is_idempotent_when_ready() {
        let interface = PlannerInterface::new(MockEngine::new(10));
        assert!(interface.initialize());
        assert!(interface.initialize());
        assert!(interface.is_ready());
    }

    #[test]
    fn test_from_config_registers_roadmaps() {
        let config: PlannerConfig = toml::from_str(
            r#"
[planner]
default_timeout_secs = 3.0

[[roadmaps]]
name = "shelf_1"
graph_file = "maps/shelf_1.rm"
occupancy_file = "maps/shelf_1.og"
transform_file = "maps/shelf_1.tf"
"#,
        )
        .unwrap();
        let interface = PlannerInterface::from_config(MockEngine::new(10), &config).unwrap();
        assert_eq!(interface.settings().default_timeout(), Duration::from_secs(3));
        assert!(interface.initialize());
        assert!(interface.get_roadmap_configs("shelf_1").is_ok());
    }

    #[test]
    fn test_from_config_rejects_invalid_timeout() {
        let config: PlannerConfig = toml::from_str(
            r#"
[planner]
default_timeout_secs = -1.0
"#,
        )
        .unwrap();
        let err = PlannerInterface::from_config(MockEngine::new(10), &config).unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));
    }

    #[test]
    fn test_solve_with_debug_diagnostics_enabled() {
        let config: PlannerConfig = toml::from_str(
            r#"
[planner]
debug = true

[[roadmaps]]
name = "a"
graph_file = "maps/a.rm"
occupancy_file = "maps/a.og"
transform_file = "maps/a.tf"
"#,
        )
        .unwrap();
        let interface = PlannerInterface::from_config(MockEngine::new(10), &config).unwrap();
        assert!(interface.settings().debug);
        assert!(interface.initialize());
        assert!(interface.solve(&request("a")).unwrap().solution().is_some());
    }

    #[test]
    fn test_register_conflict_through_facade() {
        let interface = PlannerInterface::new(MockEngine::new(10));
        interface.register_roadmap(spec("a")).unwrap();
        let mut other = spec("a");
        other.graph_file = "different.rm".into();
        assert!(matches!(
            interface.register_roadmap(other).unwrap_err(),
            PlanError::RoadmapConflict(_)
        ));
    }

    #[test]
    fn test_introspection_stages_roadmap_once() {
        let engine = MockEngine::new(10);
        let counters = engine.counters();
        let interface = PlannerInterface::new(engine);
        interface.register_roadmap(spec("a")).unwrap();
        assert!(interface.initialize());

        let configs = interface.get_roadmap_configs("a").unwrap();
        let edges = interface.get_roadmap_edges("a").unwrap();
        let transforms = interface.get_roadmap_transforms("a").unwrap();
        assert_eq!(configs.len(), 10);
        assert_eq!(edges.len(), 9);
        assert_eq!(transforms.len(), 10);
        assert_eq!(counters.load_calls(), 1);
    }
}
