//! Synthetic snapshot generation
//!
//! Every call is memoryless: densities and camera states are drawn fresh
//! from the supplied random source, with no history carried between ticks.

use rand::Rng;

use crate::registry::Registry;
use crate::types::{CameraState, CameraStatus, RoadStatus, TrafficSnapshot};

/// Probability threshold above which a camera draw reports online
const CAMERA_ONLINE_THRESHOLD: f64 = 0.5;

/// How camera statuses are filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Independent draw per camera (periodic broadcast)
    Random,
    /// Every camera online (initial snapshot for a new connection)
    AllOnline,
}

/// Generate one snapshot covering every road and camera id, in order
pub fn generate_snapshot<R: Rng>(
    road_ids: &[String],
    camera_ids: &[String],
    rng: &mut R,
    camera_mode: CameraMode,
) -> TrafficSnapshot {
    let roads = road_ids
        .iter()
        .map(|id| RoadStatus::new(id.clone(), rng.random::<f64>()))
        .collect();

    let cameras = camera_ids
        .iter()
        .map(|id| {
            let status = match camera_mode {
                CameraMode::AllOnline => CameraState::Online,
                CameraMode::Random => {
                    if rng.random::<f64>() > CAMERA_ONLINE_THRESHOLD {
                        CameraState::Online
                    } else {
                        CameraState::Offline
                    }
                }
            };
            CameraStatus::new(id.clone(), status)
        })
        .collect();

    TrafficSnapshot::with_data(roads, cameras)
}

/// Snapshot sent on every tick
pub fn periodic_snapshot<R: Rng>(registry: &Registry, rng: &mut R) -> TrafficSnapshot {
    generate_snapshot(registry.road_ids(), registry.camera_ids(), rng, CameraMode::Random)
}

/// Snapshot sent once to a client right after it connects
pub fn initial_snapshot<R: Rng>(registry: &Registry, rng: &mut R) -> TrafficSnapshot {
    generate_snapshot(registry.road_ids(), registry.camera_ids(), rng, CameraMode::AllOnline)
}
