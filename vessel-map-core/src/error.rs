use snafu::{Location, Snafu};

use crate::Overlay;

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Vessel position lookup failed"))]
    VesselLookup {
        #[snafu(implicit)]
        location: Location,
        source: BoxedError,
    },
    #[snafu(display("Route lookup failed"))]
    RouteLookup {
        #[snafu(implicit)]
        location: Location,
        source: BoxedError,
    },
    #[snafu(display("Failed to write to map overlay '{overlay}'"))]
    Sink {
        #[snafu(implicit)]
        location: Location,
        overlay: Overlay,
        source: BoxedError,
    },
}
