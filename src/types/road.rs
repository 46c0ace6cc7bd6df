//! Road status types

use serde::{Deserialize, Serialize};

/// Density below which a road is reported as free-flowing
pub const GREEN_THRESHOLD: f64 = 0.3;

/// Density below which a road is reported as slow (and above as congested)
pub const YELLOW_THRESHOLD: f64 = 0.7;

/// Congestion color of a road, encoded on the wire as a packed RGB integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum TrafficColor {
    Green,
    Yellow,
    Red,
}

impl TrafficColor {
    /// Map a density to its color using the fixed thresholds
    ///
    /// Boundaries belong to the more congested band: `0.3` is yellow and
    /// `0.7` is red.
    pub fn from_density(density: f64) -> Self {
        if density < GREEN_THRESHOLD {
            TrafficColor::Green
        } else if density < YELLOW_THRESHOLD {
            TrafficColor::Yellow
        } else {
            TrafficColor::Red
        }
    }

    /// Packed `0xRRGGBB` value sent to clients
    pub const fn rgb(self) -> u32 {
        match self {
            TrafficColor::Green => 0x00ff00,
            TrafficColor::Yellow => 0xffff00,
            TrafficColor::Red => 0xff0000,
        }
    }
}

impl From<TrafficColor> for u32 {
    fn from(color: TrafficColor) -> Self {
        color.rgb()
    }
}

impl TryFrom<u32> for TrafficColor {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x00ff00 => Ok(TrafficColor::Green),
            0xffff00 => Ok(TrafficColor::Yellow),
            0xff0000 => Ok(TrafficColor::Red),
            other => Err(format!("unknown traffic color: {:#08x}", other)),
        }
    }
}

/// Synthetic status of a single road for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadStatus {
    pub id: String,
    pub density: f64,
    pub color: TrafficColor,
}

impl RoadStatus {
    /// Create a road status whose color is derived from `density`
    pub fn new(id: impl Into<String>, density: f64) -> Self {
        Self {
            id: id.into(),
            density,
            color: TrafficColor::from_density(density),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_thresholds() {
        assert_eq!(TrafficColor::from_density(0.0), TrafficColor::Green);
        assert_eq!(TrafficColor::from_density(0.29), TrafficColor::Green);
        assert_eq!(TrafficColor::from_density(0.3), TrafficColor::Yellow);
        assert_eq!(TrafficColor::from_density(0.69), TrafficColor::Yellow);
        assert_eq!(TrafficColor::from_density(0.7), TrafficColor::Red);
        assert_eq!(TrafficColor::from_density(0.999), TrafficColor::Red);
    }

    #[test]
    fn test_color_serializes_as_rgb_integer() {
        let road = RoadStatus::new("road-h-0", 0.5);
        let json = serde_json::to_value(&road).unwrap();

        assert_eq!(json["id"], "road-h-0");
        assert_eq!(json["density"], 0.5);
        assert_eq!(json["color"], 0xffff00);
    }

    #[test]
    fn test_unknown_color_rejected() {
        let json = r#"{"id":"road-v-1","density":0.1,"color":255}"#;
        assert!(serde_json::from_str::<RoadStatus>(json).is_err());
    }
}
