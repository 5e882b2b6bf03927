//! Client for the geocoding service at [geocode.maps.co](https://geocode.maps.co).
//! Used to resolve free-text queries and structured addresses to places, and
//! coordinates back to the nearest address.
//!
//! See [the service documentation](https://geocode.maps.co/docs/)
//! for more information on its capabilities.

pub mod client;
pub mod model;
pub mod query;
pub mod util;

pub use client::{GeocodeClient, GeocodeClientBuilder};
pub use model::{Address, GeocodeResult};
pub use query::{AddressQuery, Endpoint, GeocodeQuery};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The API key was rejected (401)
    #[error("geocode invalid API key")]
    Authorization,
    /// The upstream detected abuse of this API key (403)
    #[error("geocode has detected API key abuse, contact https://maps.co/contact/ to resolve")]
    Flooding,
    /// The request-rate limit was exceeded (429)
    #[error("geocode failed due to exceeding the request limit")]
    Throttle,
    /// The upstream is overloaded (503)
    #[error("geocode failed due to high traffic on the geocode server")]
    Traffic,
    /// Any other status code of 400 and up
    #[error("unrecognized upstream error {{status code: {0}}}")]
    Upstream(u16),
    /// Something went wrong with the request (no connection, timeout, etc)
    #[error("network problem: {0}")]
    NetworkProblem(reqwest::Error),
    /// Data was received, but could not be decoded
    #[error("could not decode response: {0}")]
    JsonProblem(serde_json::Error),
    /// The configured base url could not be parsed
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(url::ParseError),
    /// The underlying HTTP client could not be constructed
    #[error("could not set up http client: {0}")]
    ClientSetup(reqwest::Error),
}

impl Error {
    /// Classify a response status code.
    ///
    /// Returns `None` for anything below 400. The body of the response plays no
    /// part in the classification.
    pub fn from_status(status: u16) -> Option<Error> {
        match status {
            401 => Some(Error::Authorization),
            403 => Some(Error::Flooding),
            429 => Some(Error::Throttle),
            503 => Some(Error::Traffic),
            code if code >= 400 => Some(Error::Upstream(code)),
            _ => None,
        }
    }
}

pub trait ClientBuilder<'a> {
    type OutputType;
    fn connection_timeout_secs(&mut self, connection_timeout_secs: u64) -> &mut Self;
    fn request_timeout_secs(&mut self, request_timeout_secs: u64) -> &mut Self;
    fn build(&self) -> Result<Self::OutputType, Error>;
}
