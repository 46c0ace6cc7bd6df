//! Camera status types

use serde::{Deserialize, Serialize};

/// Reported availability of a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraState {
    Online,
    Offline,
}

/// Synthetic status of a single camera for one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraStatus {
    pub id: String,
    pub status: CameraState,
}

impl CameraStatus {
    pub fn new(id: impl Into<String>, status: CameraState) -> Self {
        Self {
            id: id.into(),
            status,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == CameraState::Online
    }
}
