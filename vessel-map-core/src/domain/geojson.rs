use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Coordinates;

/// GeoJSON payload pushed into an overlay. Always replaces the previous
/// content of the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoJson(Value);

/// Route payload returned by the routing service. Forwarded to the map as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteGeometry(Value);

/// Data source registration for an overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoJsonSource {
    #[serde(rename = "type")]
    pub source_type: &'static str,
    pub data: GeoJson,
}

impl GeoJson {
    pub fn point(coordinates: Coordinates) -> Self {
        Self(json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": coordinates,
            }
        }))
    }

    pub fn empty_collection() -> Self {
        Self(json!({
            "type": "FeatureCollection",
            "features": [],
        }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl RouteGeometry {
    pub fn new(value: Value) -> Self {
        Self(value)
    }
}

impl From<RouteGeometry> for GeoJson {
    fn from(value: RouteGeometry) -> Self {
        Self(value.0)
    }
}

impl GeoJsonSource {
    pub fn empty() -> Self {
        Self {
            source_type: "geojson",
            data: GeoJson::empty_collection(),
        }
    }
}
