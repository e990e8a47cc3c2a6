use std::{collections::HashMap, sync::Arc};

use futures::Future;
use snafu::Report;
use strum::IntoEnumIterator;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::AbortHandle,
};
use tracing::{debug, error, instrument, warn};
use vessel_map_core::{
    ChangeBatch, Effect, GeoJson, GeoJsonSource, Imo, MapState, Overlay, OverlaySink,
    RouteGeometry, RouteOutbound, RouteRequest, VesselPosition, VesselPositionOutbound,
};

use crate::error::{Result, error::ControllerClosedSnafu};

/// Latest failure of each lookup kind, cleared by the next successful lookup
/// of the same kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupStatus {
    pub vessel: Option<String>,
    pub route: Option<String>,
}

/// Host side of a running [`Controller`].
#[derive(Debug, Clone)]
pub struct MapHandle {
    sender: mpsc::Sender<ChangeBatch>,
    status: watch::Receiver<LookupStatus>,
    state: watch::Receiver<MapState>,
}

/// One-time signal that the map has finished loading.
#[derive(Debug)]
pub struct MapReady(oneshot::Sender<()>);

/// Owns the map state and is the only writer of the overlays. Host updates
/// and lookup results are processed one at a time in [`Controller::run`].
pub struct Controller {
    state: MapState,
    vessels: Arc<dyn VesselPositionOutbound>,
    routes: Arc<dyn RouteOutbound>,
    sink: Arc<dyn OverlaySink>,
    updates: mpsc::Receiver<ChangeBatch>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_sender: mpsc::UnboundedSender<Completion>,
    ready: Option<oneshot::Receiver<()>>,
    map: MapStatus,
    pending: HashMap<Overlay, GeoJson>,
    vessel_task: TaskSlot<Imo>,
    route_task: TaskSlot<RouteRequest>,
    status: watch::Sender<LookupStatus>,
    published_state: watch::Sender<MapState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapStatus {
    Loading,
    Loaded,
    Unavailable,
}

#[derive(Debug)]
enum Completion {
    Vessel {
        generation: u64,
        imo: Imo,
        result: vessel_map_core::Result<Vec<VesselPosition>>,
    },
    Route {
        generation: u64,
        request: RouteRequest,
        result: vessel_map_core::Result<RouteGeometry>,
    },
}

/// At most one lookup of a kind is in flight. A lookup for a new key aborts
/// the previous one, and results are only accepted from the latest generation.
#[derive(Debug)]
struct TaskSlot<K> {
    generation: u64,
    in_flight: Option<(K, AbortHandle)>,
}

impl MapHandle {
    pub async fn update(&self, batch: ChangeBatch) -> Result<()> {
        self.sender
            .send(batch)
            .await
            .map_err(|_| ControllerClosedSnafu.build())
    }

    pub fn status(&self) -> watch::Receiver<LookupStatus> {
        self.status.clone()
    }

    pub fn state(&self) -> watch::Receiver<MapState> {
        self.state.clone()
    }
}

impl MapReady {
    pub fn signal(self) {
        // The controller might already have shut down, nothing to load then.
        let _ = self.0.send(());
    }
}

impl Controller {
    pub fn new(
        vessels: Arc<dyn VesselPositionOutbound>,
        routes: Arc<dyn RouteOutbound>,
        sink: Arc<dyn OverlaySink>,
        buffer_size: usize,
    ) -> (Controller, MapHandle, MapReady) {
        let (sender, updates) = mpsc::channel(buffer_size);
        let (completion_sender, completions) = mpsc::unbounded_channel();
        let (ready_sender, ready) = oneshot::channel();
        let (status, status_receiver) = watch::channel(LookupStatus::default());
        let (published_state, state_receiver) = watch::channel(MapState::default());

        let controller = Controller {
            state: MapState::default(),
            vessels,
            routes,
            sink,
            updates,
            completions,
            completion_sender,
            ready: Some(ready),
            map: MapStatus::Loading,
            pending: HashMap::new(),
            vessel_task: TaskSlot::default(),
            route_task: TaskSlot::default(),
            status,
            published_state,
        };

        let handle = MapHandle {
            sender,
            status: status_receiver,
            state: state_receiver,
        };

        (controller, handle, MapReady(ready_sender))
    }

    /// Runs until every [`MapHandle`] has been dropped.
    #[instrument(skip_all)]
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                signal = wait_ready(&mut self.ready), if self.ready.is_some() => {
                    self.ready = None;
                    match signal {
                        Ok(()) => self.load_map().await,
                        Err(_) => self.map_unavailable(),
                    }
                }
                batch = self.updates.recv() => match batch {
                    Some(batch) => self.apply(batch).await,
                    None => break,
                },
                Some(completion) = self.completions.recv() => self.complete(completion).await,
            }
        }

        self.vessel_task.abort();
        self.route_task.abort();
    }

    async fn apply(&mut self, batch: ChangeBatch) {
        let (state, effects) = self.state.reduce(batch);
        self.state = state;
        self.published_state.send_replace(self.state.clone());

        for effect in effects {
            self.perform(effect).await;
        }
    }

    async fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::Display { overlay, data } => self.display(overlay, data).await,
            Effect::FetchVessel(imo) => self.fetch_vessel(imo),
            Effect::FetchRoute(request) => self.fetch_route(request),
        }
    }

    fn fetch_vessel(&mut self, imo: Imo) {
        let Some(generation) = self.vessel_task.next_generation(&imo) else {
            debug!(%imo, "vessel lookup already in flight");
            return;
        };

        let vessels = self.vessels.clone();
        let handle = self.spawn(async move {
            let result = vessels.vessel_positions(imo).await;
            Completion::Vessel {
                generation,
                imo,
                result,
            }
        });
        self.vessel_task.start(imo, handle);
    }

    fn fetch_route(&mut self, request: RouteRequest) {
        let Some(generation) = self.route_task.next_generation(&request) else {
            debug!(?request, "route lookup already in flight");
            return;
        };

        let routes = self.routes.clone();
        let handle = self.spawn(async move {
            let result = routes.route(request.from, request.to).await;
            Completion::Route {
                generation,
                request,
                result,
            }
        });
        self.route_task.start(request, handle);
    }

    fn spawn<F>(&self, lookup: F) -> AbortHandle
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let sender = self.completion_sender.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the controller, which aborts its
            // tasks before going away.
            let _ = sender.send(lookup.await);
        })
        .abort_handle()
    }

    async fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Vessel {
                generation,
                imo,
                result,
            } => {
                if !self.vessel_task.finish(generation) {
                    debug!(%imo, "ignoring superseded vessel lookup");
                    return;
                }
                match result {
                    Ok(positions) => {
                        self.status.send_if_modified(|s| s.vessel.take().is_some());
                        match self.state.accept_vessel(imo, positions) {
                            Some(batch) => self.apply(batch).await,
                            None => debug!(%imo, "no usable vessel position"),
                        }
                    }
                    Err(e) => {
                        let report = Report::from_error(e).to_string();
                        error!(%imo, "vessel lookup failed: {report}");
                        self.status.send_modify(|s| s.vessel = Some(report));
                    }
                }
            }
            Completion::Route {
                generation,
                request,
                result,
            } => {
                if !self.route_task.finish(generation) {
                    debug!(?request, "ignoring superseded route lookup");
                    return;
                }
                match result {
                    Ok(route) => {
                        self.status.send_if_modified(|s| s.route.take().is_some());
                        match self.state.accept_route(&request, route) {
                            Some(effect) => self.perform(effect).await,
                            None => debug!(?request, "route no longer matches vessel and destination"),
                        }
                    }
                    Err(e) => {
                        let report = Report::from_error(e).to_string();
                        error!(?request, "route lookup failed: {report}");
                        self.status.send_modify(|s| s.route = Some(report));
                    }
                }
            }
        }
    }

    /// Overlays are replaced wholesale, so only the latest geometry per
    /// overlay is kept while the map is loading.
    async fn display(&mut self, overlay: Overlay, data: GeoJson) {
        match self.map {
            MapStatus::Loaded => self.set_data(overlay, &data).await,
            MapStatus::Loading => {
                self.pending.insert(overlay, data);
            }
            MapStatus::Unavailable => debug!(%overlay, "map unavailable, dropping overlay data"),
        }
    }

    fn map_unavailable(&mut self) {
        warn!("map ready signal dropped, overlays will not be drawn");
        self.map = MapStatus::Unavailable;
        self.pending.clear();
    }

    async fn set_data(&self, overlay: Overlay, data: &GeoJson) {
        if let Err(e) = self.sink.set_data(overlay, data).await {
            error!("failed to update overlay: {e:?}");
        }
    }

    /// Registers an empty source and a layer per overlay, then flushes the
    /// latest display issued for each overlay while the map was loading.
    #[instrument(skip_all, fields(app.num_pending = self.pending.len()))]
    async fn load_map(&mut self) {
        for overlay in Overlay::iter() {
            if let Err(e) = self.sink.add_source(overlay, &GeoJsonSource::empty()).await {
                error!("failed to add source: {e:?}");
            }
            if let Err(e) = self.sink.add_layer(&overlay.layer()).await {
                error!("failed to add layer: {e:?}");
            }
        }

        self.map = MapStatus::Loaded;

        let mut pending = std::mem::take(&mut self.pending);
        for overlay in Overlay::iter() {
            if let Some(data) = pending.remove(&overlay) {
                self.set_data(overlay, &data).await;
            }
        }
    }
}

async fn wait_ready(
    ready: &mut Option<oneshot::Receiver<()>>,
) -> std::result::Result<(), oneshot::error::RecvError> {
    match ready {
        Some(ready) => ready.await,
        None => futures::future::pending().await,
    }
}

impl<K: PartialEq> TaskSlot<K> {
    /// Returns the generation for a new lookup of `key`, or `None` if a
    /// lookup for the same key is still running.
    fn next_generation(&mut self, key: &K) -> Option<u64> {
        if let Some((current, handle)) = &self.in_flight {
            if current == key && !handle.is_finished() {
                return None;
            }
        }
        self.abort();
        self.generation += 1;
        Some(self.generation)
    }

    fn start(&mut self, key: K, handle: AbortHandle) {
        self.in_flight = Some((key, handle));
    }

    /// Whether a completion of `generation` is the latest one.
    fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.in_flight = None;
        true
    }

    fn abort(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl<K> Default for TaskSlot<K> {
    fn default() -> Self {
        Self {
            generation: 0,
            in_flight: None,
        }
    }
}
