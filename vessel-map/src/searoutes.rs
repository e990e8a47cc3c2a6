use async_trait::async_trait;
use http_client::HttpClient;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, serde_as};
use snafu::ResultExt;
use tracing::instrument;
use vessel_map_core::{
    Coordinates, Imo, RouteGeometry, RouteLookupSnafu, RouteOutbound, VesselLookupSnafu,
    VesselPosition, VesselPositionOutbound,
};

use crate::{error::Result, settings::SearoutesSettings};

const API_KEY_HEADER: &str = "x-api-key";

/// Client for the Searoutes vessel position and routing APIs.
#[derive(Debug, Clone)]
pub struct SearoutesClient {
    client: HttpClient,
    api_address: String,
}

#[derive(Serialize)]
struct VesselPositionsQuery {
    imos: Imo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteQuery {
    from_lon: f64,
    from_lat: f64,
    to_lon: f64,
    to_lat: f64,
}

#[derive(Debug, Deserialize)]
pub struct VesselPositionsResponse {
    #[serde(default)]
    pub vessels: Option<Vec<VesselRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselRecord {
    #[serde(default)]
    pub ais_static: Option<AisStatic>,
    #[serde(default)]
    pub ais_position: Option<AisPosition>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct AisStatic {
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub imo: Option<Imo>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
}

/// Positions are sometimes reported as strings, anything that is not a
/// number is treated as missing.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct AisPosition {
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub lat: Option<f64>,
}

impl SearoutesClient {
    pub fn new(settings: &SearoutesSettings) -> Result<Self> {
        let mut builder = HttpClient::builder()
            .gzip(true)
            .max_retries(settings.max_retries)
            .default_header(API_KEY_HEADER, &settings.api_key, true)?;

        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_address: settings.api_address.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_vessel_positions(&self, imo: Imo) -> http_client::Result<VesselPositionsResponse> {
        self.client
            .get(format!("{}/vs/vessel-positions", self.api_address))
            .query(&VesselPositionsQuery { imos: imo })
            .header("Content-Type", "application/json")
            .send()
            .await?
            .json()
            .await
    }

    async fn fetch_route(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> http_client::Result<serde_json::Value> {
        self.client
            .get(format!("{}/v2/route", self.api_address))
            .query(&RouteQuery {
                from_lon: from.longitude,
                from_lat: from.latitude,
                to_lon: to.longitude,
                to_lat: to.latitude,
            })
            .header("Response-Type", "application/geo+json")
            .send()
            .await?
            .json()
            .await
    }
}

#[async_trait]
impl VesselPositionOutbound for SearoutesClient {
    #[instrument(skip(self))]
    async fn vessel_positions(&self, imo: Imo) -> vessel_map_core::Result<Vec<VesselPosition>> {
        let response = self
            .fetch_vessel_positions(imo)
            .await
            .boxed()
            .context(VesselLookupSnafu)?;

        Ok(response.into())
    }
}

#[async_trait]
impl RouteOutbound for SearoutesClient {
    #[instrument(skip(self))]
    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> vessel_map_core::Result<RouteGeometry> {
        self.fetch_route(from, to)
            .await
            .map(RouteGeometry::new)
            .boxed()
            .context(RouteLookupSnafu)
    }
}

impl From<VesselPositionsResponse> for Vec<VesselPosition> {
    fn from(value: VesselPositionsResponse) -> Self {
        value
            .vessels
            .unwrap_or_default()
            .into_iter()
            .map(VesselPosition::from)
            .collect()
    }
}

impl From<VesselRecord> for VesselPosition {
    fn from(value: VesselRecord) -> Self {
        let VesselRecord {
            ais_static,
            ais_position,
        } = value;

        let (imo, name) = ais_static.map(|s| (s.imo, s.name)).unwrap_or_default();
        let (longitude, latitude) = ais_position.map(|p| (p.lon, p.lat)).unwrap_or_default();

        VesselPosition {
            imo,
            name,
            longitude,
            latitude,
        }
    }
}
