//! Traffic snapshot: the unit of transmission

use serde::{Deserialize, Serialize};

use super::{CameraStatus, RoadStatus};

/// Complete set of road and camera statuses for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrafficSnapshot {
    #[serde(default)]
    pub roads: Vec<RoadStatus>,
    #[serde(default)]
    pub cameras: Vec<CameraStatus>,
}

impl TrafficSnapshot {
    /// Create a snapshot from already generated statuses
    pub fn with_data(roads: Vec<RoadStatus>, cameras: Vec<CameraStatus>) -> Self {
        Self { roads, cameras }
    }

    /// Encode to the JSON text sent to clients
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Number of cameras reported online
    pub fn online_camera_count(&self) -> usize {
        self.cameras.iter().filter(|c| c.is_online()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CameraState, TrafficColor};

    #[test]
    fn test_wire_shape() {
        let snapshot = TrafficSnapshot::with_data(
            vec![RoadStatus::new("road-h--10", 0.8)],
            vec![CameraStatus::new("camera--10--10", CameraState::Online)],
        );

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["roads"][0]["id"], "road-h--10");
        assert_eq!(value["roads"][0]["color"], 0xff0000);
        assert_eq!(value["cameras"][0]["status"], "online");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_client_view() {
        let json = r#"{"roads":[{"id":"road-v-3","density":0.1,"color":65280}],"cameras":[]}"#;
        let snapshot: TrafficSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.roads[0].color, TrafficColor::Green);
        assert_eq!(snapshot.online_camera_count(), 0);
    }
}
