use serde::{Deserialize, Serialize};

/// A geographic position, serialized the way GeoJSON expects it: `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", from = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// Destination as supplied by the host. Either field may be missing, in which
/// case the point is incomplete and must neither be drawn nor routed to.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DestinationPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinates {
    /// Returns `None` unless both values are finite numbers.
    pub fn new(longitude: f64, latitude: f64) -> Option<Self> {
        (longitude.is_finite() && latitude.is_finite()).then_some(Self {
            longitude,
            latitude,
        })
    }

    pub fn from_parts(longitude: Option<f64>, latitude: Option<f64>) -> Option<Self> {
        Self::new(longitude?, latitude?)
    }
}

impl DestinationPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.longitude, self.latitude)
    }

    pub fn is_complete(&self) -> bool {
        self.coordinates().is_some()
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.longitude, value.latitude]
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}
