//! The forward and reverse geocoding client.
//!
//! Every operation maps to exactly one GET request. Errors are classified on
//! the status code alone, before the body is read; nothing is retried.
use std::{fmt, time::Duration};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    query::{build_url, reverse_params, AddressQuery, Endpoint, GeocodeQuery},
    ClientBuilder,
    Error::{self, *},
    GeocodeResult,
};

/// Cheap to clone; clones share the same connection pool.
#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for GeocodeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodeClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

pub struct GeocodeClientBuilder<'a> {
    api_key: &'a str,
    base_url: &'a str,
    connection_timeout_secs: u64,
    request_timeout_secs: u64,
    user_agent: &'a str,
}

impl<'a> GeocodeClientBuilder<'a> {
    pub fn new(api_key: &'a str) -> Self {
        Self {
            api_key,
            base_url: GeocodeClient::GEOCODE_MAPS_CO,
            connection_timeout_secs: GeocodeClient::CONNECTION_TIMEOUT_SECS,
            request_timeout_secs: GeocodeClient::REQUEST_TIMEOUT_SECS,
            user_agent: GeocodeClient::USER_AGENT,
        }
    }

    pub fn user_agent(&mut self, user_agent: &'a str) -> &mut Self {
        self.user_agent = user_agent;
        self
    }

    /// Point the client at another host, e.g. a local mock server.
    ///
    /// A path on the base url is kept as a prefix, so
    /// `https://proxy.example/geo` sends searches to `/geo/search`.
    pub fn base_url(&mut self, base_url: &'a str) -> &mut Self {
        self.base_url = base_url;
        self
    }
}

impl<'a> ClientBuilder<'a> for GeocodeClientBuilder<'a> {
    type OutputType = GeocodeClient;

    fn connection_timeout_secs(&mut self, connection_timeout_secs: u64) -> &mut Self {
        self.connection_timeout_secs = connection_timeout_secs;
        self
    }

    fn request_timeout_secs(&mut self, request_timeout_secs: u64) -> &mut Self {
        self.request_timeout_secs = request_timeout_secs;
        self
    }

    fn build(&self) -> Result<Self::OutputType, Error> {
        let base_url = Url::parse(self.base_url).map_err(InvalidBaseUrl)?;

        let client = http_client(
            self.user_agent,
            self.connection_timeout_secs,
            self.request_timeout_secs,
        )
        .map_err(ClientSetup)?;

        Ok(GeocodeClient {
            client,
            base_url,
            api_key: self.api_key.to_string(),
        })
    }
}

fn http_client(
    user_agent: &str,
    connection_timeout_secs: u64,
    request_timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(connection_timeout_secs))
        .timeout(Duration::new(request_timeout_secs, 0))
        .build()
}

impl GeocodeClient {
    const GEOCODE_MAPS_CO: &'static str = "https://geocode.maps.co";
    const USER_AGENT: &'static str = concat!("maps-co-geocode/", env!("CARGO_PKG_VERSION"));
    const CONNECTION_TIMEOUT_SECS: u64 = 10;
    const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Client with the same defaults as [`GeocodeClientBuilder::new`]. The key
    /// is not checked until first use.
    ///
    /// # Panics
    ///
    /// Panics when the TLS backend cannot be initialized, like
    /// [`reqwest::Client::new`]. Use the builder to handle that as an error.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = http_client(
            Self::USER_AGENT,
            Self::CONNECTION_TIMEOUT_SECS,
            Self::REQUEST_TIMEOUT_SECS,
        )
        .expect("http client with default settings");

        Self {
            client,
            base_url: Url::parse(Self::GEOCODE_MAPS_CO).expect("default base url is valid"),
            api_key: api_key.into(),
        }
    }

    /// Forward geocode a free-text description such as an address or a
    /// well known place name.
    /// Yields all matches in the order the service ranks them.
    #[instrument(skip(self))]
    pub async fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, Error> {
        self.search_with(&GeocodeQuery::from(query), None).await
    }

    /// Same as [`GeocodeClient::geocode`], but gives up after `timeout`.
    #[instrument(skip(self))]
    pub async fn geocode_with_timeout(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Vec<GeocodeResult>, Error> {
        self.search_with(&GeocodeQuery::from(query), Some(timeout)).await
    }

    /// Forward geocode a structured address. Only the fields that are set
    /// and non-empty are sent.
    #[instrument(skip(self))]
    pub async fn address_geocode(
        &self,
        address: &AddressQuery,
    ) -> Result<Vec<GeocodeResult>, Error> {
        self.call_api(Endpoint::Search, &address.params(), None).await
    }

    /// Same as [`GeocodeClient::address_geocode`], but gives up after `timeout`.
    #[instrument(skip(self))]
    pub async fn address_geocode_with_timeout(
        &self,
        address: &AddressQuery,
        timeout: Duration,
    ) -> Result<Vec<GeocodeResult>, Error> {
        self.call_api(Endpoint::Search, &address.params(), Some(timeout)).await
    }

    /// Forward geocode either kind of query.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeResult>, Error> {
        self.search_with(query, None).await
    }

    /// Reverse geocode a coordinate pair to the nearest address.
    /// The returned result has its [`crate::Address`] filled in.
    #[instrument(skip(self))]
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<GeocodeResult, Error> {
        self.call_api(Endpoint::Reverse, &reverse_params(lat, lon), None).await
    }

    /// Same as [`GeocodeClient::reverse`], but gives up after `timeout`.
    #[instrument(skip(self))]
    pub async fn reverse_with_timeout(
        &self,
        lat: f64,
        lon: f64,
        timeout: Duration,
    ) -> Result<GeocodeResult, Error> {
        self.call_api(Endpoint::Reverse, &reverse_params(lat, lon), Some(timeout)).await
    }

    async fn search_with(
        &self,
        query: &GeocodeQuery,
        timeout: Option<Duration>,
    ) -> Result<Vec<GeocodeResult>, Error> {
        self.call_api(Endpoint::Search, &query.params(), timeout).await
    }

    async fn call_api<K, V, T>(
        &self,
        endpoint: Endpoint,
        params: &[(K, V)],
        timeout: Option<Duration>,
    ) -> Result<T, Error>
    where
        K: AsRef<str>,
        V: AsRef<str>,
        T: DeserializeOwned,
    {
        // The url carries the api key, so only the path is logged
        let url = build_url(&self.base_url, endpoint, params, &self.api_key);
        debug!(path = endpoint.path(), "sending geocode request");

        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let client_response = request.send().await.map_err(NetworkProblem)?;

        let status = client_response.status().as_u16();
        debug!(status, "received geocode response");

        if let Some(error) = Error::from_status(status) {
            warn!(status, %error, "geocode request rejected");
            return Err(error);
        }

        let body = client_response.bytes().await.map_err(NetworkProblem)?;

        serde_json::from_slice(&body).map_err(JsonProblem)
    }
}
