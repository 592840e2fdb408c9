pub mod method;
pub mod time_series;

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const BASE_URL: &str = "https://api.twelvedata.com";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API key is not a valid header value: {0}")]
    InvalidApiKey(#[from] InvalidHeaderValue),
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

pub struct TwelveDataClient {
    base_url: String,
    reqwest: Client,
}

impl TwelveDataClient {
    pub fn new(api_key: &str) -> Result<Self, ClientError> {
        Self::with_options(api_key, BASE_URL, None)
    }

    pub fn with_options(
        api_key: &str,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let mut authorization = HeaderValue::from_str(format!("apikey {api_key}").as_str())?;
        authorization.set_sensitive(true);
        headers.insert("Authorization", authorization);

        let mut builder = ClientBuilder::new().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            reqwest: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> reqwest::Result<T> {
        debug!(url, "twelve data request");

        let response = self
            .reqwest
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(response)
    }

    pub async fn call<M: method::Method>(&self, params: M::Params) -> reqwest::Result<M::Response> {
        let url = format!("{}{}", self.base_url, M::PATH);
        self.get(&url, &params).await
    }
}
