use std::time::Duration;

use reqwest::{
    Client, IntoUrl,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use snafu::ResultExt;

use crate::{
    RequestBuilder, Result,
    error::{BuildSnafu, InvalidHeaderSnafu},
};

const DEFAULT_MAX_RETRIES: u32 = 3;

/// Client that traces every request and retries transient failures
/// (connection errors, 5xx and 429 responses) with exponential backoff.
#[derive(Debug, Clone)]
pub struct HttpClient(ClientWithMiddleware);

#[derive(Debug)]
pub struct HttpClientBuilder {
    client: reqwest::ClientBuilder,
    headers: HeaderMap,
    max_retries: u32,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::new_with(Client::new(), DEFAULT_MAX_RETRIES)
    }

    fn new_with(inner: Client, max_retries: u32) -> Self {
        let client = ClientBuilder::new(inner)
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(max_retries),
            ))
            .build();

        Self(client)
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
        RequestBuilder(self.0.get(url))
    }
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self {
            client: reqwest::ClientBuilder::new(),
            headers: HeaderMap::new(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.timeout(timeout);
        self
    }

    pub fn gzip(mut self, enable: bool) -> Self {
        self.client = self.client.gzip(enable);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Attaches a header to every request sent by the built client.
    /// Sensitive values are redacted from `Debug` output.
    pub fn default_header(
        mut self,
        name: &'static str,
        value: impl AsRef<str>,
        sensitive: bool,
    ) -> Result<Self> {
        let mut value =
            HeaderValue::from_str(value.as_ref()).context(InvalidHeaderSnafu { name })?;
        value.set_sensitive(sensitive);
        self.headers.insert(HeaderName::from_static(name), value);
        Ok(self)
    }

    pub fn build(self) -> Result<HttpClient> {
        let inner = self
            .client
            .default_headers(self.headers)
            .build()
            .context(BuildSnafu)?;
        Ok(HttpClient::new_with(inner, self.max_retries))
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
