use async_trait::async_trait;
use serde::Serialize;
use snafu::ResultExt;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::Mutex,
};
use vessel_map_core::{GeoJson, GeoJsonSource, Layer, Overlay, OverlaySink, SinkSnafu};

use crate::{error::Result, settings::MapSettings};

/// Command for the map renderer, one JSON document per line.
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MapCommand<'a> {
    Init {
        #[serde(rename = "accessToken")]
        access_token: &'a str,
        options: MapOptions<'a>,
    },
    AddSource {
        name: Overlay,
        source: &'a GeoJsonSource,
    },
    AddLayer {
        layer: &'a Layer,
    },
    SetData {
        name: Overlay,
        data: &'a GeoJson,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions<'a> {
    pub style: &'a str,
    pub zoom: f64,
    pub track_resize: bool,
}

/// [`OverlaySink`] that forwards every map operation as a JSON line to a
/// renderer reading from `writer`.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: AsyncWrite + Unpin + Send> JsonLinesSink<W> {
    /// Creates the sink and tells the renderer to create the map.
    pub async fn init(writer: W, settings: &MapSettings) -> Result<Self> {
        let sink = Self {
            writer: Mutex::new(writer),
        };

        sink.write(&MapCommand::Init {
            access_token: &settings.access_token,
            options: MapOptions {
                style: &settings.style,
                zoom: settings.zoom,
                track_resize: settings.track_resize,
            },
        })
        .await?;

        Ok(sink)
    }

    async fn write(&self, command: &MapCommand<'_>) -> Result<()> {
        let mut line = serde_json::to_vec(command)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn write_for(
        &self,
        overlay: Overlay,
        command: MapCommand<'_>,
    ) -> vessel_map_core::Result<()> {
        self.write(&command)
            .await
            .boxed()
            .context(SinkSnafu { overlay })
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> OverlaySink for JsonLinesSink<W> {
    async fn add_source(
        &self,
        overlay: Overlay,
        source: &GeoJsonSource,
    ) -> vessel_map_core::Result<()> {
        self.write_for(
            overlay,
            MapCommand::AddSource {
                name: overlay,
                source,
            },
        )
        .await
    }

    async fn add_layer(&self, layer: &Layer) -> vessel_map_core::Result<()> {
        self.write_for(layer.source, MapCommand::AddLayer { layer })
            .await
    }

    async fn set_data(&self, overlay: Overlay, data: &GeoJson) -> vessel_map_core::Result<()> {
        self.write_for(
            overlay,
            MapCommand::SetData {
                name: overlay,
                data,
            },
        )
        .await
    }
}
