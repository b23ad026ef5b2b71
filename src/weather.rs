//! Weather client for the OpenWeatherMap current-weather API
//!
//! The client never fails its caller: any non-success status,
//! transport fault or unparseable body degrades to the sentinel
//! snapshot so the pipeline can always render something.

use crate::models::{Coordinate, WeatherSnapshot};
use crate::{Result, RouteSafeError};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    weather: Vec<ConditionEntry>,
    main: MainReadings,
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    main: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

/// Client for the OpenWeatherMap current-weather endpoint
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a new weather client
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Fetch the current weather at a coordinate.
    ///
    /// Always returns a snapshot; failures degrade to the sentinel.
    #[instrument(skip(self))]
    pub async fn fetch(&self, coordinate: Coordinate) -> WeatherSnapshot {
        match self.try_fetch(coordinate).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    "Weather unavailable for ({:.4}, {:.4}): {}",
                    coordinate.latitude, coordinate.longitude, err
                );
                WeatherSnapshot::unavailable()
            }
        }
    }

    async fn try_fetch(&self, coordinate: Coordinate) -> Result<WeatherSnapshot> {
        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, coordinate.latitude, coordinate.longitude, self.api_key
        );

        debug!(
            "Fetching weather for ({:.4}, {:.4})",
            coordinate.latitude, coordinate.longitude
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteSafeError::provider("weather", status.as_u16(), body));
        }

        let body = response.text().await?;
        parse_current_weather(&body)
    }
}

/// Parse an OpenWeatherMap current-weather body into a snapshot.
pub fn parse_current_weather(body: &str) -> Result<WeatherSnapshot> {
    let parsed: CurrentWeatherResponse = serde_json::from_str(body).map_err(|e| {
        RouteSafeError::provider("weather", 200, format!("unparseable response: {e}"))
    })?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .map_or_else(|| crate::models::weather::UNAVAILABLE_CONDITION.to_string(), |c| c.main);

    Ok(WeatherSnapshot::new(
        condition,
        Some(parsed.main.temp),
        parsed.visibility,
    ))
}
