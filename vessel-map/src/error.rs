use snafu::{Location, Snafu};
use tokio_util::codec::LinesCodecError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("HTTP client error"), context(false))]
    HttpClient {
        #[snafu(implicit)]
        location: Location,
        source: http_client::Error,
    },
    #[snafu(display("Invalid configuration"), context(false))]
    Config {
        #[snafu(implicit)]
        location: Location,
        source: config::ConfigError,
    },
    #[snafu(display("Failed to write map command"), context(false))]
    Io {
        #[snafu(implicit)]
        location: Location,
        source: std::io::Error,
    },
    #[snafu(display("Failed to serialize map command"), context(false))]
    Json {
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
    #[snafu(display("Failed to read host input"), context(false))]
    HostInput {
        #[snafu(implicit)]
        location: Location,
        source: LinesCodecError,
    },
    #[snafu(display("Map controller is no longer running"))]
    ControllerClosed {
        #[snafu(implicit)]
        location: Location,
    },
}
