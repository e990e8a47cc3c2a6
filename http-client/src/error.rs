use reqwest::{StatusCode, Url, header::InvalidHeaderValue};
use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("HTTP transport error"), context(false))]
    Transport {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },
    #[snafu(display("HTTP middleware error"), context(false))]
    Middleware {
        #[snafu(implicit)]
        location: Location,
        source: reqwest_middleware::Error,
    },
    #[snafu(display("HTTP request failed, status: '{status}', url: '{url}', body: '{body}'"))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: Url,
        status: StatusCode,
        body: String,
    },
    #[snafu(display("Failed to deserialize response body, url: '{url}', body: '{body}'"))]
    Deserialize {
        #[snafu(implicit)]
        location: Location,
        url: Url,
        body: String,
        source: serde_json::Error,
    },
    #[snafu(display("Invalid header value for '{name}'"))]
    InvalidHeader {
        #[snafu(implicit)]
        location: Location,
        name: &'static str,
        source: InvalidHeaderValue,
    },
    #[snafu(display("Failed to build HTTP client"))]
    Build {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::FailedRequest { status, .. } => Some(*status),
            Error::Transport { source, .. } => source.status(),
            Error::Middleware { .. }
            | Error::Deserialize { .. }
            | Error::InvalidHeader { .. }
            | Error::Build { .. } => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Error::FailedRequest { body, .. } | Error::Deserialize { body, .. } => Some(body),
            Error::Transport { .. }
            | Error::Middleware { .. }
            | Error::InvalidHeader { .. }
            | Error::Build { .. } => None,
        }
    }
}
