use async_trait::async_trait;

use crate::{Coordinates, Imo, Result, RouteGeometry, VesselPosition};

#[async_trait]
pub trait VesselPositionOutbound: Send + Sync {
    /// An unknown identifier yields an empty list, not an error.
    async fn vessel_positions(&self, imo: Imo) -> Result<Vec<VesselPosition>>;
}

#[async_trait]
pub trait RouteOutbound: Send + Sync {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<RouteGeometry>;
}
