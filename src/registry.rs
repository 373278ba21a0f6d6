//! Roadmap registry
//!
//! Maps logical roadmap names to their file specifications and tracks
//! which name currently occupies each device slot. Registration happens
//! at configuration time; afterwards the spec map is read-only and only
//! the slot assignments mutate (under the session lock, during reloads).

use crate::error::{PlanError, Result};
use crate::types::{RoadmapSpec, SlotIndex};
use std::collections::HashMap;

/// Registered roadmaps and their device slot assignments
#[derive(Debug, Default)]
pub struct RoadmapRegistry {
    specs: HashMap<String, RoadmapSpec>,
    slots: HashMap<SlotIndex, String>,
}

impl RoadmapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a roadmap specification under its name.
    ///
    /// Re-registering an identical spec is a no-op, so repeated
    /// configuration passes stay cheap; the same name with different
    /// files is a conflict.
    pub fn register(&mut self, spec: RoadmapSpec) -> Result<()> {
        if let Some(existing) = self.specs.get(&spec.name) {
            if existing.same_files(&spec) {
                return Ok(());
            }
            return Err(PlanError::RoadmapConflict(spec.name));
        }
        tracing::debug!(roadmap = %spec.name, "registered roadmap");
        self.specs.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Look up a registered specification by name
    pub fn lookup(&self, name: &str) -> Result<&RoadmapSpec> {
        self.specs
            .get(name)
            .ok_or_else(|| PlanError::RoadmapNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Slot currently holding the named roadmap, if any.
    ///
    /// Linear scan: roadmap counts are tens, not thousands.
    pub fn find_slot_for(&self, name: &str) -> Option<SlotIndex> {
        self.slots
            .iter()
            .find(|(_, occupant)| occupant.as_str() == name)
            .map(|(&slot, _)| slot)
    }

    /// Record that `name` now occupies `slot`, evicting the previous
    /// occupant's mapping
    pub fn assign_slot(&mut self, slot: SlotIndex, name: &str) {
        if let Some(previous) = self.slots.insert(slot, name.to_string()) {
            if previous != name {
                tracing::debug!(slot, evicted = %previous, "slot reassigned");
            }
        }
    }
}
