use std::{fmt::Display, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Coordinates;

/// IMO vessel identifier. Zero is treated as "no vessel".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Imo(i64);

/// A single record from the vessel position service. Any field may be absent
/// or unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VesselPosition {
    pub imo: Option<Imo>,
    pub name: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// Most recently fetched and validated vessel position.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVessel {
    pub imo: Imo,
    pub name: String,
    pub coordinates: Coordinates,
}

impl Imo {
    pub fn new(imo: i64) -> Self {
        Self(imo)
    }

    pub fn into_inner(self) -> i64 {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0 != 0
    }
}

impl ResolvedVessel {
    /// Only the first record is considered. Returns `None` if there are no
    /// records or the first one lacks an identifier or a numeric position.
    pub fn from_positions(positions: impl IntoIterator<Item = VesselPosition>) -> Option<Self> {
        let VesselPosition {
            imo,
            name,
            longitude,
            latitude,
        } = positions.into_iter().next()?;

        Some(Self {
            imo: imo?,
            name: name.unwrap_or_default(),
            coordinates: Coordinates::from_parts(longitude, latitude)?,
        })
    }

    /// Whether this record belongs to the vessel currently requested.
    pub fn matches(&self, imo: Option<Imo>) -> bool {
        imo.is_some_and(|imo| imo.is_set() && imo == self.imo)
    }
}

impl FromStr for Imo {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<Imo> for i64 {
    fn from(value: Imo) -> Self {
        value.0
    }
}

impl Display for Imo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(feature = "test")]
mod test {
    use super::*;

    impl VesselPosition {
        pub fn test_new(imo: i64, longitude: f64, latitude: f64) -> Self {
            Self {
                imo: Some(Imo::new(imo)),
                name: Some(format!("TEST VESSEL {imo}")),
                longitude: Some(longitude),
                latitude: Some(latitude),
            }
        }
    }

    impl ResolvedVessel {
        pub fn test_new(imo: i64, longitude: f64, latitude: f64) -> Self {
            Self {
                imo: Imo::new(imo),
                name: format!("TEST VESSEL {imo}"),
                coordinates: Coordinates {
                    longitude,
                    latitude,
                },
            }
        }
    }
}
