//! Route assessment pipeline and selection policy
//!
//! One check runs geocoding for both endpoints, a weather snapshot at
//! each, the alternative-route request, per-route scoring and the
//! selection policy, strictly in that order. A geocoding failure
//! aborts before any downstream call; a routing failure degrades to
//! an empty route list plus a diagnostic carried in the assessment.

use crate::geocode::GeocoderClient;
use crate::models::{Coordinate, Route, ScoredRoute, WeatherSnapshot};
use crate::routing::RoutingClient;
use crate::scorer::RiskScorer;
use crate::weather::WeatherClient;
use crate::{Result, RouteSafeError};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// The complete result of one route-safety check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAssessment {
    pub source: Coordinate,
    pub destination: Coordinate,
    pub source_weather: WeatherSnapshot,
    pub destination_weather: WeatherSnapshot,
    /// Minimum-travel-time route among those labeled safe, when any
    pub safest: Option<Route>,
    /// Every alternative in provider order
    pub alternatives: Vec<Route>,
    /// Raw diagnostic when the routing provider failed
    pub routing_diagnostic: Option<String>,
}

/// Per-session cache of the last complete assessment.
///
/// Replaced wholesale on each successful check; a failed check leaves
/// the previous assessment untouched.
#[derive(Debug, Default)]
pub struct SessionState {
    current: Option<RouteAssessment>,
}

impl SessionState {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole assessment in one step
    pub fn replace(&mut self, assessment: RouteAssessment) {
        self.current = Some(assessment);
    }

    /// The last committed assessment, if any
    #[must_use]
    pub fn current(&self) -> Option<&RouteAssessment> {
        self.current.as_ref()
    }
}

/// Orchestrates the geocode → weather → routing → scoring sequence.
pub struct Pipeline {
    geocoder: GeocoderClient,
    weather: WeatherClient,
    routing: RoutingClient,
    scorer: RiskScorer,
}

impl Pipeline {
    /// Assemble a pipeline from its clients and the scorer
    #[must_use]
    pub fn new(
        geocoder: GeocoderClient,
        weather: WeatherClient,
        routing: RoutingClient,
        scorer: RiskScorer,
    ) -> Self {
        Self {
            geocoder,
            weather,
            routing,
            scorer,
        }
    }

    /// Run one route-safety check between two place names.
    #[instrument(skip(self))]
    pub async fn check(&self, source_name: &str, destination_name: &str) -> Result<RouteAssessment> {
        let source = self
            .geocoder
            .resolve(source_name)
            .await?
            .ok_or_else(|| RouteSafeError::geocode_not_found(source_name))?;
        let destination = self
            .geocoder
            .resolve(destination_name)
            .await?
            .ok_or_else(|| RouteSafeError::geocode_not_found(destination_name))?;

        let source_weather = self.weather.fetch(source).await;
        let destination_weather = self.weather.fetch(destination).await;

        let (alternatives, routing_diagnostic) =
            match self.routing.alternatives(source, destination).await {
                Ok(routes) => (routes, None),
                Err(err) => {
                    warn!("Routing provider failed: {}", err);
                    (Vec::new(), Some(err.user_message()))
                }
            };

        let mut scored = Vec::with_capacity(alternatives.len());
        for route in &alternatives {
            let label = self.scorer.score(route)?;
            scored.push(ScoredRoute {
                route: route.clone(),
                label,
            });
        }

        let safest = select_safest(&scored).cloned();
        info!(
            "Assessed {} route(s), safest: {}",
            alternatives.len(),
            safest
                .as_ref()
                .map_or_else(|| "none".to_string(), |r| format_travel_time(r.travel_time_minutes))
        );

        Ok(RouteAssessment {
            source,
            destination,
            source_weather,
            destination_weather,
            safest,
            alternatives,
            routing_diagnostic,
        })
    }
}

/// Pick the minimum-travel-time route among those labeled safe.
///
/// Single linear pass in input order; ties keep the earlier route.
/// Returns `None` when no entry is labeled safe.
#[must_use]
pub fn select_safest(scored: &[ScoredRoute]) -> Option<&Route> {
    let mut best: Option<&Route> = None;
    for entry in scored {
        if !entry.is_safe() {
            continue;
        }
        let better = match best {
            Some(current) => entry.route.travel_time_minutes < current.travel_time_minutes,
            None => true,
        };
        if better {
            best = Some(&entry.route);
        }
    }
    best
}

/// Render a travel time in minutes as "D days, H hours, M minutes".
#[must_use]
pub fn format_travel_time(travel_minutes: f64) -> String {
    let days = (travel_minutes / 1440.0) as u64;
    let hours = ((travel_minutes / 60.0) % 24.0) as u64;
    let minutes = (travel_minutes % 60.0) as u64;
    format!("{days} days, {hours} hours, {minutes} minutes")
}
