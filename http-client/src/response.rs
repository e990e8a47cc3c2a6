use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::{Result, error::DeserializeSnafu};

#[derive(Debug)]
pub struct Response(pub(crate) reqwest::Response);

impl Response {
    pub fn status(&self) -> StatusCode {
        self.0.status()
    }

    pub fn url(&self) -> &Url {
        self.0.url()
    }

    /// Reads the full body before deserializing so that a malformed payload
    /// is reported together with the body that caused it.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let url = self.0.url().clone();
        let body = self.0.text().await?;
        serde_json::from_str(&body).context(DeserializeSnafu { url, body })
    }

    pub async fn text(self) -> Result<String> {
        self.0.text().await.map_err(From::from)
    }
}
