//! Geocoder client for the Nominatim search API
//!
//! Resolves a free-text place name to a [`Coordinate`]. The three
//! outcomes a caller may need to tell apart stay distinct: a resolved
//! coordinate, an empty result (`Ok(None)`), and a provider or
//! transport failure (`Err`).

use crate::models::Coordinate;
use crate::{Result, RouteSafeError};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// One entry of a Nominatim search response. Coordinates arrive as
/// decimal strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Client for the Nominatim geocoding service
pub struct GeocoderClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocoderClient {
    /// Create a new geocoder client
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Resolve a free-text place name to a coordinate.
    ///
    /// Returns `Ok(None)` when the service knows no such place.
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> Result<Option<Coordinate>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(name)
        );

        debug!("Geocoding '{}'", name);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteSafeError::provider("geocoder", status.as_u16(), body));
        }

        let places: Vec<NominatimPlace> = response.json().await?;

        let Some(place) = places.into_iter().next() else {
            warn!("No geocoding results for '{}'", name);
            return Ok(None);
        };

        let coordinate = parse_place(&place)?;
        info!(
            "Resolved '{}' to ({:.4}, {:.4})",
            name, coordinate.latitude, coordinate.longitude
        );
        Ok(Some(coordinate))
    }
}

fn parse_place(place: &NominatimPlace) -> Result<Coordinate> {
    let latitude: f64 = place.lat.parse().map_err(|_| {
        RouteSafeError::provider("geocoder", 200, format!("non-numeric latitude '{}'", place.lat))
    })?;
    let longitude: f64 = place.lon.parse().map_err(|_| {
        RouteSafeError::provider(
            "geocoder",
            200,
            format!("non-numeric longitude '{}'", place.lon),
        )
    })?;
    Ok(Coordinate::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place() {
        let place = NominatimPlace {
            lat: "12.9715987".to_string(),
            lon: "77.5945627".to_string(),
        };
        let coordinate = parse_place(&place).unwrap();
        assert_eq!(coordinate.latitude, 12.9715987);
        assert_eq!(coordinate.longitude, 77.5945627);
    }

    #[test]
    fn test_parse_place_rejects_non_numeric() {
        let place = NominatimPlace {
            lat: "twelve".to_string(),
            lon: "77.59".to_string(),
        };
        let result = parse_place(&place);
        assert!(matches!(
            result,
            Err(RouteSafeError::Provider {
                service: "geocoder",
                ..
            })
        ));
    }

    #[test]
    fn test_response_shape() {
        let body = r#"[{"place_id": 12345, "lat": "12.97", "lon": "77.59", "display_name": "Bengaluru"}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].lat, "12.97");
    }

    #[test]
    fn test_empty_response_shape() {
        let places: Vec<NominatimPlace> = serde_json::from_str("[]").unwrap();
        assert!(places.is_empty());
    }
}
