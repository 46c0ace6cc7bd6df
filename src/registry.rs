//! Fixed enumeration of road and camera identifiers
//!
//! The grid spans coordinates `-10..=10` on both axes. Each coordinate has
//! one horizontal and one vertical road, and every grid point except the
//! origin carries a camera. The registry is built once at startup and
//! shared read-only for the lifetime of the process.

use std::ops::RangeInclusive;

/// Grid coordinate range covered by roads and cameras
pub const GRID_RANGE: RangeInclusive<i32> = -10..=10;

/// Number of roads in the registry (two per coordinate)
pub const ROAD_COUNT: usize = 42;

/// Number of cameras in the registry (full grid minus the origin)
pub const CAMERA_COUNT: usize = 440;

/// Enumerate road ids as `road-h-{i}`, `road-v-{i}` pairs in coordinate order
pub fn build_road_ids() -> Vec<String> {
    let mut ids = Vec::with_capacity(ROAD_COUNT);
    for i in GRID_RANGE {
        ids.push(format!("road-h-{}", i));
        ids.push(format!("road-v-{}", i));
    }
    ids
}

/// Enumerate camera ids as `camera-{i}-{j}` in row-major order, skipping the origin
pub fn build_camera_ids() -> Vec<String> {
    let mut ids = Vec::with_capacity(CAMERA_COUNT);
    for i in GRID_RANGE {
        for j in GRID_RANGE {
            if i == 0 && j == 0 {
                continue;
            }
            ids.push(format!("camera-{}-{}", i, j));
        }
    }
    ids
}

/// Read-only set of every entity reported in a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    road_ids: Vec<String>,
    camera_ids: Vec<String>,
}

impl Registry {
    /// Build the registry from the fixed grid
    pub fn new() -> Self {
        Self {
            road_ids: build_road_ids(),
            camera_ids: build_camera_ids(),
        }
    }

    pub fn road_ids(&self) -> &[String] {
        &self.road_ids
    }

    pub fn camera_ids(&self) -> &[String] {
        &self.camera_ids
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
