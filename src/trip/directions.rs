//! Routed-polyline lookups.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use super::{LookupError, geo::LatLng, polyline};

/// One routed lookup per leg; implementations must not retry.
pub trait DirectionsClient: Send + Sync {
    /// Encoded polyline for the route from `from` to `to`.
    fn route(&self, from: LatLng, to: LatLng, mode: &str) -> Result<String, LookupError>;
}

/// Directions API over HTTP JSON (`routes[0].overview_polyline.points`).
pub struct HttpDirections {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Deserialize)]
struct RouteEntry {
    overview_polyline: OverviewPolyline,
}

#[derive(Deserialize)]
struct OverviewPolyline {
    points: String,
}

impl HttpDirections {
    pub fn new(endpoint: &str, api_key: String) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
        })
    }
}

impl DirectionsClient for HttpDirections {
    fn route(&self, from: LatLng, to: LatLng, mode: &str) -> Result<String, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("origin", format!("{},{}", from.lat, from.lng)),
                ("destination", format!("{},{}", to.lat, to.lng)),
                ("mode", mode.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: DirectionsResponse = response
            .json()
            .map_err(|e| LookupError::Decode(e.to_string()))?;
        first_route(body)
    }
}

/// The first route's polyline, rejected unless it decodes to a drawable path.
fn first_route(body: DirectionsResponse) -> Result<String, LookupError> {
    let points = body
        .routes
        .into_iter()
        .next()
        .map(|r| r.overview_polyline.points)
        .filter(|p| !p.is_empty())
        .ok_or(LookupError::NoRoute)?;

    match polyline::decode(&points) {
        Some(decoded) if decoded.len() >= 2 => Ok(points),
        Some(_) => Err(LookupError::NoRoute),
        None => Err(LookupError::Decode(format!("malformed polyline `{points}`"))),
    }
}
