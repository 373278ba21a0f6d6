//! Occupancy translation
//!
//! Callers provide obstacle data as sparse world-space voxel updates; the
//! engine wants a dense grid over the active roadmap's occupancy volume.
//! Translation happens once per solve call. An update that falls outside
//! the volume is rejected outright: clipping it away could hide a real
//! obstacle and let a solve "succeed" through it.

use crate::error::{PlanError, Result};
use crate::types::GridMetadata;
use nalgebra::Point3;

/// State of one voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelState {
    Free,
    Occupied,
}

/// Sparse caller-supplied occupancy updates, world-space coordinates.
///
/// Cells not mentioned keep the grid default (free). Later updates for
/// the same cell override earlier ones.
#[derive(Debug, Clone, Default)]
pub struct OccupancyData {
    pub entries: Vec<(Point3<f32>, VoxelState)>,
}

impl OccupancyData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for marking a world point occupied
    pub fn occupy(&mut self, point: Point3<f32>) {
        self.entries.push((point, VoxelState::Occupied));
    }
}

/// Dense voxel grid in the engine's expected layout (flat, x fastest)
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    metadata: GridMetadata,
    /// 0 = free, 1 = occupied
    cells: Vec<u8>,
}

impl VoxelGrid {
    /// All-free grid over the given volume
    pub fn empty(metadata: &GridMetadata) -> Self {
        Self {
            metadata: *metadata,
            cells: vec![0; metadata.cell_count()],
        }
    }

    pub fn metadata(&self) -> &GridMetadata {
        &self.metadata
    }

    pub fn is_occupied(&self, cell: [usize; 3]) -> bool {
        self.cells[self.metadata.index(cell)] == 1
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    fn set(&mut self, cell: [usize; 3], state: VoxelState) {
        let index = self.metadata.index(cell);
        self.cells[index] = match state {
            VoxelState::Free => 0,
            VoxelState::Occupied => 1,
        };
    }
}

/// Translate sparse occupancy updates into a dense grid over the active
/// roadmap's volume.
///
/// Fails with [`PlanError::OutOfBounds`] on the first entry outside the
/// extents; no partial grid is returned.
pub fn to_voxel_grid(data: &OccupancyData, metadata: &GridMetadata) -> Result<VoxelGrid> {
    let mut grid = VoxelGrid::empty(metadata);
    for (point, state) in &data.entries {
        let cell = metadata.cell_at(point).ok_or(PlanError::OutOfBounds {
            x: point.x,
            y: point.y,
            z: point.z,
        })?;
        grid.set(cell, *state);
    }
    Ok(grid)
}
