//! Core data types shared across the planning bridge.
//!
//! Key types for callers:
//! - [`RoadmapSpec`]: identity and file set of a precomputed roadmap
//! - [`ToolPose`]: 6-DOF end-effector transform (also reused as per-axis
//!   tolerance and weight sextuples)
//! - [`Solution`]: the two result shapes the engine can produce

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

/// Index into a roadmap's state set
pub type StateId = usize;

/// Engine-side handle for a roadmap resident on the planning device
pub type SlotIndex = u16;

/// Opaque joint-space configuration (one value per joint)
pub type JointConfig = Vec<f32>;

/// Directed connection between two roadmap states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: StateId,
    pub to: StateId,
}

/// 6-DOF transform of the robot's end-effector.
///
/// Translation in meters, rotation as roll/pitch/yaw in radians. Goal
/// specifications reuse this as a per-axis tolerance region and as a
/// per-axis distance weighting, so the components are kept flat rather
/// than wrapped in an isometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToolPose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rx: f32,
    pub ry: f32,
    pub rz: f32,
}

impl ToolPose {
    pub fn new(x: f32, y: f32, z: f32, rx: f32, ry: f32, rz: f32) -> Self {
        Self { x, y, z, rx, ry, rz }
    }

    pub fn from_array(v: [f32; 6]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }

    /// Components in x, y, z, rx, ry, rz order
    pub fn as_array(&self) -> [f32; 6] {
        [self.x, self.y, self.z, self.rx, self.ry, self.rz]
    }

    /// Interpret as a rigid transform (translation + RPY rotation)
    pub fn to_isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(
            Translation3::from(Vector3::new(self.x, self.y, self.z)),
            UnitQuaternion::from_euler_angles(self.rx, self.ry, self.rz),
        )
    }
}

/// Identity and static description of a precomputed roadmap.
///
/// Immutable once registered; the three file paths define spec equality
/// for idempotent re-registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapSpec {
    /// Logical name, unique registry key
    pub name: String,
    /// Roadmap graph file (states and edges)
    pub graph_file: String,
    /// Voxel region file describing the roadmap's occupancy volume
    pub occupancy_file: String,
    /// Tool transform file (one end-effector pose per state)
    pub transform_file: String,
}

impl RoadmapSpec {
    /// True if both specs describe the same files (name excluded)
    pub fn same_files(&self, other: &RoadmapSpec) -> bool {
        self.graph_file == other.graph_file
            && self.occupancy_file == other.occupancy_file
            && self.transform_file == other.transform_file
    }
}

/// Spatial metadata of a roadmap's occupancy volume.
///
/// `origin` is the world position of the corner of cell (0, 0, 0); cells
/// extend along +x/+y/+z with `dims` cells per axis at `resolution`
/// meters per cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetadata {
    pub origin: Point3<f32>,
    pub resolution: f32,
    pub dims: [usize; 3],
}

impl GridMetadata {
    pub fn new(origin: Point3<f32>, resolution: f32, dims: [usize; 3]) -> Self {
        Self {
            origin,
            resolution,
            dims,
        }
    }

    /// Total cell count of the dense grid
    pub fn cell_count(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// Map a world point to its cell coordinate, or `None` outside the
    /// extents. Non-finite coordinates have no cell and map to `None` as
    /// well (NaN compares false against every bound, so an explicit
    /// check is required).
    pub fn cell_at(&self, point: &Point3<f32>) -> Option<[usize; 3]> {
        let rel = point - self.origin;
        let mut cell = [0usize; 3];
        for axis in 0..3 {
            if !rel[axis].is_finite() || rel[axis] < 0.0 {
                return None;
            }
            let c = (rel[axis] / self.resolution).floor() as usize;
            if c >= self.dims[axis] {
                return None;
            }
            cell[axis] = c;
        }
        Some(cell)
    }

    /// Flat row-major index (x fastest) of a cell coordinate
    pub fn index(&self, cell: [usize; 3]) -> usize {
        (cell[2] * self.dims[1] + cell[1]) * self.dims[0] + cell[0]
    }
}

/// Handle returned by the engine after staging a roadmap on the device
#[derive(Debug, Clone)]
pub struct RoadmapHandle {
    /// Device slot the roadmap occupies
    pub slot: SlotIndex,
    /// Number of states in the roadmap graph
    pub num_states: usize,
    /// Spatial metadata of the roadmap's occupancy volume
    pub grid: GridMetadata,
}

/// Which result shape a solve call should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFormat {
    /// Flat ordered joint-space waypoints
    JointPath,
    /// Roadmap traversal: state configs plus waypoint/edge index sequences
    RoadmapPath,
}

/// A successful planning result, owned by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    /// Dense joint-space path
    Path(Vec<JointConfig>),
    /// Path through the roadmap graph
    Traversal {
        /// Configs of the resolved roadmap states
        states: Vec<JointConfig>,
        /// Ordered state indices along the path
        waypoints: Vec<StateId>,
        /// Ordered edge indices connecting the waypoints
        edges: Vec<usize>,
    },
}

impl Solution {
    pub fn is_empty(&self) -> bool {
        match self {
            Solution::Path(configs) => configs.is_empty(),
            Solution::Traversal { waypoints, .. } => waypoints.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_pose_array_roundtrip() {
        let pose = ToolPose::new(0.1, 0.2, 0.3, 0.0, 0.5, 1.0);
        assert_eq!(ToolPose::from_array(pose.as_array()), pose);
    }

    #[test]
    fn test_tool_pose_isometry_translation() {
        let pose = ToolPose::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0);
        let iso = pose.to_isometry();
        assert_eq!(iso.translation.vector, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cell_at_inside_and_outside() {
        let meta = GridMetadata::new(Point3::origin(), 0.1, [10, 10, 10]);
        assert_eq!(meta.cell_at(&Point3::new(0.05, 0.15, 0.95)), Some([0, 1, 9]));
        assert_eq!(meta.cell_at(&Point3::new(-0.01, 0.0, 0.0)), None);
        assert_eq!(meta.cell_at(&Point3::new(0.0, 0.0, 1.0)), None);
    }

    #[test]
    fn test_cell_at_rejects_non_finite_coordinates() {
        let meta = GridMetadata::new(Point3::origin(), 0.1, [10, 10, 10]);
        assert_eq!(meta.cell_at(&Point3::new(f32::NAN, 0.05, 0.05)), None);
        assert_eq!(meta.cell_at(&Point3::new(0.05, f32::INFINITY, 0.05)), None);
        assert_eq!(meta.cell_at(&Point3::new(0.05, 0.05, f32::NEG_INFINITY)), None);
    }

    #[test]
    fn test_index_is_row_major_x_fastest() {
        let meta = GridMetadata::new(Point3::origin(), 0.1, [4, 3, 2]);
        assert_eq!(meta.index([0, 0, 0]), 0);
        assert_eq!(meta.index([1, 0, 0]), 1);
        assert_eq!(meta.index([0, 1, 0]), 4);
        assert_eq!(meta.index([0, 0, 1]), 12);
        assert_eq!(meta.index([3, 2, 1]), 23);
    }

    #[test]
    fn test_spec_same_files_ignores_name() {
        let a = RoadmapSpec {
            name: "a".into(),
            graph_file: "g".into(),
            occupancy_file: "o".into(),
            transform_file: "t".into(),
        };
        let mut b = a.clone();
        b.name = "b".into();
        assert!(a.same_files(&b));
        b.graph_file = "other".into();
        assert!(!a.same_files(&b));
    }
}
