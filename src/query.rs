//! Request construction for the search and reverse endpoints.
//!
//! All values are form-urlencoded: spaces become `+` and every other reserved
//! character is percent-escaped. The API key is always the last parameter.
use url::Url;

/// The two endpoints offered by the service.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    Reverse,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Search => "/search",
            Endpoint::Reverse => "/reverse",
        }
    }
}

/// A forward lookup, either free text or a structured address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeQuery {
    Text(String),
    Address(AddressQuery),
}

impl GeocodeQuery {
    /// Query parameters for this lookup, without the API key.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            GeocodeQuery::Text(text) => vec![("q", text.as_str())],
            GeocodeQuery::Address(address) => address.params(),
        }
    }
}

impl From<&str> for GeocodeQuery {
    fn from(text: &str) -> Self {
        GeocodeQuery::Text(text.to_string())
    }
}

impl From<AddressQuery> for GeocodeQuery {
    fn from(address: AddressQuery) -> Self {
        GeocodeQuery::Address(address)
    }
}

/// Structured address search. Every field is optional; absent and empty
/// fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressQuery {
    pub street: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postalcode: Option<String>,
}

impl AddressQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn postalcode(mut self, postalcode: impl Into<String>) -> Self {
        self.postalcode = Some(postalcode.into());
        self
    }

    /// The non-empty fields as `(name, value)` pairs, in a fixed order.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("county", &self.county),
            ("state", &self.state),
            ("country", &self.country),
            ("postalcode", &self.postalcode),
        ]
        .into_iter()
        .filter_map(|(name, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((name, v)),
            _ => None,
        })
        .collect()
    }
}

/// Parameters for a reverse lookup.
///
/// Coordinates are written in their shortest round-trip decimal form. No range
/// check is done here; the service decides what is valid.
pub fn reverse_params(lat: f64, lon: f64) -> [(&'static str, String); 2] {
    [("lat", lat.to_string()), ("lon", lon.to_string())]
}

/// Build the full request url for `endpoint` on top of `base`.
///
/// The endpoint path is appended to whatever path `base` already has. Any
/// query or fragment on `base` is dropped.
pub fn build_url<K, V>(base: &Url, endpoint: Endpoint, params: &[(K, V)], api_key: &str) -> Url
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = base.clone();
    let path = format!("{}{}", base.path().trim_end_matches('/'), endpoint.path());
    url.set_path(&path);
    url.set_fragment(None);

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (name, value) in params {
            pairs.append_pair(name.as_ref(), value.as_ref());
        }
        pairs.append_pair("api_key", api_key);
    }

    url
}
