use std::sync::Arc;

use futures::StreamExt;
use tokio::{io::AsyncRead, task::JoinSet};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{error, info, instrument, warn};
use vessel_map_core::{OverlaySink, RouteOutbound, VesselPositionOutbound};

use crate::{
    controller::{Controller, MapHandle, MapReady},
    error::Result,
    host::HostMessage,
    searoutes::SearoutesClient,
    settings::Settings,
    sink::JsonLinesSink,
};

const MAX_HOST_MESSAGE_LENGTH: usize = 4096;

pub struct App {
    controller: Controller,
    handle: MapHandle,
    ready: MapReady,
}

impl App {
    /// Builds the app against the Searoutes API, writing map commands to stdout.
    pub async fn build(settings: &Settings) -> Result<App> {
        let searoutes = Arc::new(SearoutesClient::new(&settings.searoutes)?);
        let sink = JsonLinesSink::init(tokio::io::stdout(), &settings.map).await?;

        Ok(Self::build_with(
            searoutes.clone(),
            searoutes,
            Arc::new(sink),
            settings.channel_buffer_size,
        ))
    }

    pub fn build_with(
        vessels: Arc<dyn VesselPositionOutbound>,
        routes: Arc<dyn RouteOutbound>,
        sink: Arc<dyn OverlaySink>,
        channel_buffer_size: usize,
    ) -> App {
        let (controller, handle, ready) =
            Controller::new(vessels, routes, sink, channel_buffer_size);

        App {
            controller,
            handle,
            ready,
        }
    }

    pub async fn run(self) -> Result<()> {
        self.run_with(tokio::io::stdin()).await
    }

    /// Feeds host messages from `input` to the controller until the input
    /// closes, then waits for the controller to wind down.
    pub async fn run_with(self, input: impl AsyncRead + Unpin) -> Result<()> {
        let Self {
            controller,
            handle,
            ready,
        } = self;

        let mut set = JoinSet::new();
        set.spawn(controller.run());
        set.spawn(log_status(handle.clone()));

        let result = consume_host_messages(input, handle, ready).await;

        // The status logger stops once the controller has dropped its sender.
        while let Some(out) = set.join_next().await {
            if let Err(e) = out {
                error!("map task exited unexpectedly: {e:?}");
            }
        }

        result
    }
}

#[instrument(skip_all)]
async fn consume_host_messages(
    input: impl AsyncRead + Unpin,
    handle: MapHandle,
    ready: MapReady,
) -> Result<()> {
    let mut lines = FramedRead::new(
        input,
        LinesCodec::new_with_max_length(MAX_HOST_MESSAGE_LENGTH),
    );
    let mut ready = Some(ready);

    while let Some(line) = lines.next().await {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<HostMessage>(&line) {
            Err(e) => warn!("invalid host message '{line}': {e}"),
            Ok(HostMessage::Update(update)) => handle.update(update.into()).await?,
            Ok(HostMessage::MapReady) => match ready.take() {
                Some(ready) => ready.signal(),
                None => warn!("map ready received more than once"),
            },
        }
    }

    Ok(())
}

async fn log_status(handle: MapHandle) {
    let mut status = handle.status();
    drop(handle);

    while status.changed().await.is_ok() {
        let current = status.borrow_and_update().clone();
        match (&current.vessel, &current.route) {
            (None, None) => info!("all lookups healthy"),
            (vessel, route) => warn!(?vessel, ?route, "lookups failing"),
        }
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured directive.
pub fn init_tracing(directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
