use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer};
use serde_with::{DefaultOnError, DeserializeAs, DisplayFromStr, PickFirst, Same};
use vessel_map_core::{Change, ChangeBatch, Imo};

/// A message from the embedding application, one JSON document per line.
///
/// Properties left out of an update are untouched, `null` clears them:
/// `{"type":"update","latitude":10.0,"longitude":20.0}` moves the destination
/// while `{"type":"update","imo":null}` stops tracking the vessel. Numeric
/// strings are accepted, any other non-number counts as written but unset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    Update(PropertyUpdate),
    MapReady,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyUpdate {
    #[serde(default, deserialize_with = "written_number")]
    pub imo: Option<Option<Imo>>,
    #[serde(default, deserialize_with = "written_number")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "written_number")]
    pub longitude: Option<Option<f64>>,
}

/// Only called for properties present in the message, absent ones fall back
/// to `None` through `#[serde(default)]`.
fn written_number<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    DefaultOnError::<Option<PickFirst<(Same, DisplayFromStr)>>>::deserialize_as(deserializer)
        .map(Some)
}

impl From<PropertyUpdate> for ChangeBatch {
    fn from(value: PropertyUpdate) -> Self {
        let PropertyUpdate {
            imo,
            latitude,
            longitude,
        } = value;

        let mut batch = ChangeBatch::new();
        if let Some(imo) = imo {
            batch.push(Change::Imo(imo));
        }
        if let Some(latitude) = latitude {
            batch.push(Change::Latitude(latitude));
        }
        if let Some(longitude) = longitude {
            batch.push(Change::Longitude(longitude));
        }
        batch
    }
}
