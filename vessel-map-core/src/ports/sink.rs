use async_trait::async_trait;

use crate::{GeoJson, GeoJsonSource, Layer, Overlay, Result};

/// The map rendering engine. Sources and layers are registered once the map
/// has loaded, after which overlay data is only ever replaced wholesale.
#[async_trait]
pub trait OverlaySink: Send + Sync {
    async fn add_source(&self, overlay: Overlay, source: &GeoJsonSource) -> Result<()>;
    async fn add_layer(&self, layer: &Layer) -> Result<()>;
    async fn set_data(&self, overlay: Overlay, data: &GeoJson) -> Result<()>;
}
