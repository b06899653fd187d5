//! Shared-trip snapshot lookups.

use std::time::Duration;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{StatusCode, blocking::Client};

use super::{Itinerary, LookupError};

/// Read API for itinerary snapshots.
pub trait TripStore: Send + Sync {
    fn by_share_token(&self, token: &str) -> Result<Itinerary, LookupError>;
    fn by_trip_id(&self, id: &str, version: Option<&str>) -> Result<Itinerary, LookupError>;
}

/// JSON document store at `{endpoint}/shares/{token}` and `{endpoint}/trips/{id}`.
pub struct HttpTripStore {
    client: Client,
    endpoint: String,
}

impl HttpTripStore {
    pub fn new(endpoint: &str) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<Itinerary, LookupError> {
        let response = self.client.get(url).query(query).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(LookupError::NotFound),
            s if !s.is_success() => Err(LookupError::Status(s.as_u16())),
            _ => response
                .json()
                .map_err(|e| LookupError::Decode(e.to_string())),
        }
    }
}

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, NON_ALPHANUMERIC).to_string()
}

impl TripStore for HttpTripStore {
    fn by_share_token(&self, token: &str) -> Result<Itinerary, LookupError> {
        self.fetch(&format!("{}/shares/{}", self.endpoint, segment(token)), &[])
    }

    fn by_trip_id(&self, id: &str, version: Option<&str>) -> Result<Itinerary, LookupError> {
        let url = format!("{}/trips/{}", self.endpoint, segment(id));
        match version {
            Some(v) => self.fetch(&url, &[("version", v)]),
            None => self.fetch(&url, &[]),
        }
    }
}

/// Placeholder used when no trip endpoint is configured.
pub struct NoTripStore;

impl TripStore for NoTripStore {
    fn by_share_token(&self, _: &str) -> Result<Itinerary, LookupError> {
        Err(LookupError::Unconfigured)
    }

    fn by_trip_id(&self, _: &str, _: Option<&str>) -> Result<Itinerary, LookupError> {
        Err(LookupError::Unconfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("abc123"), "abc123");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_unconfigured_store() {
        assert!(matches!(NoTripStore.by_share_token("x"), Err(LookupError::Unconfigured)));
    }
}
