use crate::{
    Coordinates, DestinationPoint, GeoJson, Imo, Overlay, ResolvedVessel, RouteGeometry,
    VesselPosition,
};

/// Everything the map controller knows at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapState {
    pub imo: Option<Imo>,
    pub destination: DestinationPoint,
    pub vessel: Option<ResolvedVessel>,
}

/// A single property write. `None` values clear the property.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Imo(Option<Imo>),
    Latitude(Option<f64>),
    Longitude(Option<f64>),
    Vessel(ResolvedVessel),
}

/// All property writes of one update cycle. Writes are applied in order, the
/// overlays are evaluated once for the whole batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeBatch(Vec<Change>);

/// Work the runtime has to carry out after a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Display { overlay: Overlay, data: GeoJson },
    FetchVessel(Imo),
    FetchRoute(RouteRequest),
}

/// Endpoints of a route lookup, also used to identify an in-flight lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub from: Coordinates,
    pub to: Coordinates,
}

#[derive(Debug, Default)]
struct Touched {
    imo: bool,
    latitude: bool,
    longitude: bool,
    vessel: Option<Coordinates>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imo(mut self, imo: Option<Imo>) -> Self {
        self.0.push(Change::Imo(imo));
        self
    }

    pub fn latitude(mut self, latitude: Option<f64>) -> Self {
        self.0.push(Change::Latitude(latitude));
        self
    }

    pub fn longitude(mut self, longitude: Option<f64>) -> Self {
        self.0.push(Change::Longitude(longitude));
        self
    }

    pub fn destination(self, latitude: f64, longitude: f64) -> Self {
        self.latitude(Some(latitude)).longitude(Some(longitude))
    }

    pub fn vessel(mut self, vessel: ResolvedVessel) -> Self {
        self.0.push(Change::Vessel(vessel));
        self
    }

    pub fn push(&mut self, change: Change) {
        self.0.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Change>> for ChangeBatch {
    fn from(value: Vec<Change>) -> Self {
        Self(value)
    }
}

impl MapState {
    /// Applies a batch of property writes and returns the resulting state
    /// together with the effects it calls for.
    ///
    /// - The destination marker is redrawn only when both latitude and
    ///   longitude were written in this batch and both are numeric.
    /// - A vessel lookup is issued when the identifier was written and is set.
    /// - The route is re-evaluated when the destination was written, the
    ///   identifier was written or a new vessel position arrived, and is only
    ///   requested when [`MapState::route_request`] allows it.
    pub fn reduce(&self, batch: ChangeBatch) -> (MapState, Vec<Effect>) {
        let mut state = self.clone();
        let mut touched = Touched::default();

        for change in batch.0 {
            match change {
                Change::Imo(imo) => {
                    state.imo = imo;
                    touched.imo = true;
                }
                Change::Latitude(latitude) => {
                    state.destination.latitude = latitude;
                    touched.latitude = true;
                }
                Change::Longitude(longitude) => {
                    state.destination.longitude = longitude;
                    touched.longitude = true;
                }
                Change::Vessel(vessel) => {
                    touched.vessel = Some(vessel.coordinates);
                    state.vessel = Some(vessel);
                }
            }
        }

        let mut effects = Vec::new();
        let destination_touched = touched.latitude && touched.longitude;

        if destination_touched {
            if let Some(coordinates) = state.destination.coordinates() {
                effects.push(Effect::Display {
                    overlay: Overlay::Destination,
                    data: GeoJson::point(coordinates),
                });
            }
        }

        if let Some(coordinates) = touched.vessel {
            effects.push(Effect::Display {
                overlay: Overlay::Vessel,
                data: GeoJson::point(coordinates),
            });
        }

        if touched.imo {
            if let Some(imo) = state.imo.filter(Imo::is_set) {
                effects.push(Effect::FetchVessel(imo));
            }
        }

        if destination_touched || touched.imo || touched.vessel.is_some() {
            if let Some(request) = state.route_request() {
                effects.push(Effect::FetchRoute(request));
            }
        }

        (state, effects)
    }

    /// The route that should currently be shown, if the vessel and destination
    /// are both known and the vessel belongs to the requested identifier.
    pub fn route_request(&self) -> Option<RouteRequest> {
        let vessel = self.vessel.as_ref().filter(|v| v.matches(self.imo))?;
        let to = self.destination.coordinates()?;

        Some(RouteRequest {
            from: vessel.coordinates,
            to,
        })
    }

    /// Validates a vessel lookup result for `requested`. Results for an
    /// identifier that is no longer current are discarded, as are responses
    /// without a usable first record.
    pub fn accept_vessel(
        &self,
        requested: Imo,
        positions: impl IntoIterator<Item = VesselPosition>,
    ) -> Option<ChangeBatch> {
        if self.imo != Some(requested) {
            return None;
        }
        ResolvedVessel::from_positions(positions).map(|v| ChangeBatch::new().vessel(v))
    }

    /// Turns a route lookup result into a display effect, unless the state
    /// has moved on and the route no longer connects the current endpoints.
    pub fn accept_route(&self, request: &RouteRequest, route: RouteGeometry) -> Option<Effect> {
        (self.route_request().as_ref() == Some(request)).then(|| Effect::Display {
            overlay: Overlay::Route,
            data: route.into(),
        })
    }
}
