//! Device session
//!
//! Owns the single engine handle and the capacity-1 roadmap cache. The
//! device keeps exactly one roadmap active; switching roadmaps pays a
//! full reload, a deliberate trade of reload latency for bounded device
//! memory. All methods here assume the caller already holds the
//! session-wide lock (the engine handle is not safe for concurrent use).

use crate::engine::{PlanRequest, PlanningEngine, RawPlanResult};
use crate::error::{PlanError, Result};
use crate::registry::RoadmapRegistry;
use crate::types::{RoadmapHandle, RoadmapSpec};
use tracing::{debug, info};

/// Capacity-1 cache state: which roadmap is resident on the device
#[derive(Debug)]
enum LoadedRoadmap {
    Empty,
    Loaded { name: String, handle: RoadmapHandle },
}

impl LoadedRoadmap {
    /// Cache-hit predicate: the handle if `name` is the resident roadmap
    fn hit(&self, name: &str) -> Option<&RoadmapHandle> {
        match self {
            LoadedRoadmap::Loaded {
                name: loaded,
                handle,
            } if loaded.as_str() == name => Some(handle),
            _ => None,
        }
    }
}

/// Exclusive session with the external planning engine
#[derive(Debug)]
pub struct DeviceSession<E: PlanningEngine> {
    engine: E,
    loaded: LoadedRoadmap,
}

impl<E: PlanningEngine> DeviceSession<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            loaded: LoadedRoadmap::Empty,
        }
    }

    /// Start the engine; called exactly once by the interface
    pub fn init(&mut self) -> Result<()> {
        self.engine.init()
    }

    /// Make the given roadmap the resident one, returning its handle.
    ///
    /// Cache hit costs nothing and issues no engine call. A miss stages
    /// the roadmap on the device and records the new slot assignment. If
    /// the load fails the cache is left empty, never pointing at a
    /// previous roadmap the caller did not ask for.
    pub fn ensure_loaded(
        &mut self,
        registry: &mut RoadmapRegistry,
        spec: &RoadmapSpec,
    ) -> Result<RoadmapHandle> {
        if let Some(handle) = self.loaded.hit(&spec.name) {
            debug!(roadmap = %spec.name, slot = handle.slot, "roadmap already resident");
            return Ok(handle.clone());
        }

        self.loaded = LoadedRoadmap::Empty;
        let handle = self
            .engine
            .load_roadmap(spec)
            .map_err(|e| PlanError::LoadFailure(e.to_string()))?;
        registry.assign_slot(handle.slot, &spec.name);
        info!(
            roadmap = %spec.name,
            slot = handle.slot,
            states = handle.num_states,
            "roadmap staged on device"
        );
        self.loaded = LoadedRoadmap::Loaded {
            name: spec.name.clone(),
            handle: handle.clone(),
        };
        Ok(handle)
    }

    /// Issue exactly one blocking solve call
    pub fn plan(&mut self, request: &PlanRequest) -> Result<RawPlanResult> {
        self.engine.plan(request)
    }

    /// Read-only access to the engine for roadmap introspection
    pub fn engine(&self) -> &E {
        &self.engine
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

    #[test]
    fn test_second_ensure_is_cache_hit() {
        let engine = MockEngine::new(50);
        let counters = engine.counters();
        let mut registry = RoadmapRegistry::new();
        let mut session = DeviceSession::new(engine);

        let first = session.ensure_loaded(&mut registry, &spec("a")).unwrap();
        let second = session.ensure_loaded(&mut registry, &spec("a")).unwrap();
        assert_eq!(first.slot, second.slot);
        assert_eq!(counters.load_calls(), 1);
    }

    #[test]
    fn test_capacity_one_cache_has_no_memory() {
        let engine = MockEngine::new(50);
        let counters = engine.counters();
        let mut registry = RoadmapRegistry::new();
        let mut session = DeviceSession::new(engine);

        session.ensure_loaded(&mut registry, &spec("a")).unwrap();
        session.ensure_loaded(&mut registry, &spec("b")).unwrap();
        session.ensure_loaded(&mut registry, &spec("a")).unwrap();
        assert_eq!(counters.load_calls(), 3);
    }

    #[test]
    fn test_failed_load_leaves_cache_empty() {
        let engine = MockEngine::new(50).failing_load();
        let counters = engine.counters();
        let mut registry = RoadmapRegistry::new();
        let mut session = DeviceSession::new(engine);

        let err = session.ensure_loaded(&mut registry, &spec("a")).unwrap_err();
        assert!(matches!(err, PlanError::LoadFailure(_)));

        // no stale fallback: the next attempt must go back to the engine
        let _ = session.ensure_loaded(&mut registry, &spec("a"));
        assert_eq!(counters.load_calls(), 2);
    }

    #[test]
    fn test_slot_assignment_tracks_reloads() {
        let engine = MockEngine::new(50);
        let mut registry = RoadmapRegistry::new();
        let mut session = DeviceSession::new(engine);

        let a = session.ensure_loaded(&mut registry, &spec("a")).unwrap();
        assert_eq!(registry.find_slot_for("a"), Some(a.slot));

        let b = session.ensure_loaded(&mut registry, &spec("b")).unwrap();
        assert_eq!(registry.find_slot_for("b"), Some(b.slot));
    }
}
