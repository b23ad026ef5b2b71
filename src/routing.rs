//! Routing client for the GraphHopper alternative-route API
//!
//! Requests up to three alternative driving routes and normalizes the
//! provider's conventions at the boundary: coordinates flip from
//! (longitude, latitude) to (latitude, longitude), times go from
//! milliseconds to minutes, distances from meters to kilometers.

use crate::models::{Coordinate, Route};
use crate::{Result, RouteSafeError};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Maximum number of alternative paths requested from the provider
pub const MAX_ALTERNATIVE_PATHS: u32 = 3;

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    paths: Vec<PathEntry>,
}

#[derive(Debug, Deserialize)]
struct PathEntry {
    /// Travel time in milliseconds
    time: f64,
    /// Distance in meters
    distance: f64,
    points: PointsEntry,
}

#[derive(Debug, Deserialize)]
struct PointsEntry {
    /// GeoJSON-style [longitude, latitude] pairs
    coordinates: Vec<[f64; 2]>,
}

/// Client for the GraphHopper routing service
pub struct RoutingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RoutingClient {
    /// Create a new routing client
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Request alternative routes between two coordinates.
    ///
    /// Returns the provider's paths in response order, at most
    /// [`MAX_ALTERNATIVE_PATHS`]. A non-success status is an error
    /// carrying the raw response body, distinct from a successful
    /// answer with zero routes.
    #[instrument(skip(self))]
    pub async fn alternatives(&self, source: Coordinate, destination: Coordinate) -> Result<Vec<Route>> {
        let url = format!(
            "{}/route?point={},{}&point={},{}&vehicle=car&locale=en&points_encoded=false\
             &algorithm=alternative_route&alternative_route.max_paths={}&key={}",
            self.base_url,
            source.latitude,
            source.longitude,
            destination.latitude,
            destination.longitude,
            MAX_ALTERNATIVE_PATHS,
            self.api_key
        );

        debug!(
            "Requesting alternative routes ({:.4}, {:.4}) -> ({:.4}, {:.4})",
            source.latitude, source.longitude, destination.latitude, destination.longitude
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RouteSafeError::provider("routing", status.as_u16(), body));
        }

        let routes = parse_alternatives(&body)
            .map_err(|e| RouteSafeError::provider("routing", status.as_u16(), format!("unparseable response: {e}")))?;

        info!("Provider returned {} alternative route(s)", routes.len());
        Ok(routes)
    }
}

/// Parse a GraphHopper route response body into normalized routes.
///
/// Pure over the body so normalization is testable without a network.
pub fn parse_alternatives(body: &str) -> std::result::Result<Vec<Route>, serde_json::Error> {
    let response: RouteResponse = serde_json::from_str(body)?;

    Ok(response
        .paths
        .into_iter()
        .map(|path| Route {
            travel_time_minutes: path.time / 60_000.0,
            distance_km: path.distance / 1_000.0,
            points: path
                .points
                .coordinates
                .into_iter()
                .map(|[lon, lat]| Coordinate::new(lat, lon))
                .collect(),
        })
        .collect())
}
