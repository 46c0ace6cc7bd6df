//! Data types for the traffic broadcast server
//!
//! This module contains the snapshot structures sent to clients.

mod camera;
mod road;
mod snapshot;

pub use camera::{CameraState, CameraStatus};
pub use road::{RoadStatus, TrafficColor, GREEN_THRESHOLD, YELLOW_THRESHOLD};
pub use snapshot::TrafficSnapshot;
