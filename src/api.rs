//! JSON API over the route assessment pipeline

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::error;

use crate::pipeline::{format_travel_time, Pipeline, RouteAssessment, SessionState};
use crate::RouteSafeError;

/// Shared application state: the pipeline plus the session cache.
pub struct AppState {
    pipeline: Pipeline,
    session: RwLock<SessionState>,
}

impl AppState {
    /// Create state with an empty session
    #[must_use]
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            session: RwLock::new(SessionState::new()),
        }
    }
}

#[derive(Deserialize)]
pub struct CheckRequest {
    pub source: String,
    pub destination: String,
}

#[derive(Serialize)]
pub struct ApiCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize)]
pub struct ApiWeather {
    pub condition: String,
    pub temperature: String,
    pub visibility: String,
}

#[derive(Serialize)]
pub struct ApiRoute {
    /// Stable display label, "Route 1" through "Route N"
    pub label: String,
    pub travel_time_minutes: f64,
    pub distance_km: f64,
    pub formatted_time: String,
    /// Polyline as [latitude, longitude] pairs
    pub points: Vec<[f64; 2]>,
}

#[derive(Serialize)]
pub struct ApiAssessment {
    pub source: ApiCoordinate,
    pub destination: ApiCoordinate,
    pub source_weather: ApiWeather,
    pub destination_weather: ApiWeather,
    pub safest: Option<ApiRoute>,
    pub alternatives: Vec<ApiRoute>,
    pub routing_diagnostic: Option<String>,
}

#[derive(Serialize)]
pub struct ApiError {
    pub message: String,
}

impl From<&RouteAssessment> for ApiAssessment {
    fn from(assessment: &RouteAssessment) -> Self {
        let to_api_route = |route: &crate::models::Route, label: String| ApiRoute {
            label,
            travel_time_minutes: route.travel_time_minutes,
            distance_km: route.distance_km,
            formatted_time: format_travel_time(route.travel_time_minutes),
            points: route
                .points
                .iter()
                .map(|p| [p.latitude, p.longitude])
                .collect(),
        };

        let to_api_weather = |snapshot: &crate::models::WeatherSnapshot| ApiWeather {
            condition: snapshot.condition.clone(),
            temperature: snapshot.temperature_label(),
            visibility: snapshot.visibility_label(),
        };

        Self {
            source: ApiCoordinate {
                latitude: assessment.source.latitude,
                longitude: assessment.source.longitude,
            },
            destination: ApiCoordinate {
                latitude: assessment.destination.latitude,
                longitude: assessment.destination.longitude,
            },
            source_weather: to_api_weather(&assessment.source_weather),
            destination_weather: to_api_weather(&assessment.destination_weather),
            safest: assessment
                .safest
                .as_ref()
                .map(|route| to_api_route(route, "Safest Route".to_string())),
            alternatives: assessment
                .alternatives
                .iter()
                .enumerate()
                .map(|(i, route)| to_api_route(route, format!("Route {}", i + 1)))
                .collect(),
            routing_diagnostic: assessment.routing_diagnostic.clone(),
        }
    }
}

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/check", post(check))
        .route("/assessment", get(assessment))
        .with_state(state)
}

async fn check(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<ApiAssessment>, (StatusCode, Json<ApiError>)> {
    let source = request.source.trim();
    let destination = request.destination.trim();
    if source.is_empty() || destination.is_empty() {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Both source and destination are required.",
        ));
    }

    match state.pipeline.check(source, destination).await {
        Ok(result) => {
            let response = ApiAssessment::from(&result);
            // Commit only a complete result; failures above leave the
            // previous session visible.
            state.session.write().await.replace(result);
            Ok(Json(response))
        }
        Err(err @ RouteSafeError::GeocodeNotFound { .. }) => Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            &err.user_message(),
        )),
        Err(err) => {
            error!("Route check failed: {}", err);
            Err(api_error(StatusCode::BAD_GATEWAY, &err.user_message()))
        }
    }
}

async fn assessment(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiAssessment>, StatusCode> {
    let session = state.session.read().await;
    session
        .current()
        .map(|assessment| Json(ApiAssessment::from(assessment)))
        .ok_or(StatusCode::NOT_FOUND)
}

fn api_error(status: StatusCode, message: &str) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            message: message.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, Route, WeatherSnapshot};

    fn sample_assessment() -> RouteAssessment {
        RouteAssessment {
            source: Coordinate::new(12.97, 77.59),
            destination: Coordinate::new(13.08, 80.27),
            source_weather: WeatherSnapshot::new("Clouds".to_string(), Some(27.4), Some(6000.0)),
            destination_weather: WeatherSnapshot::unavailable(),
            safest: Some(Route {
                travel_time_minutes: 45.0,
                distance_km: 291.5,
                points: vec![Coordinate::new(12.97, 77.59)],
            }),
            alternatives: vec![
                Route {
                    travel_time_minutes: 45.0,
                    distance_km: 291.5,
                    points: vec![Coordinate::new(12.97, 77.59)],
                },
                Route {
                    travel_time_minutes: 60.0,
                    distance_km: 310.0,
                    points: vec![Coordinate::new(12.98, 77.60)],
                },
            ],
            routing_diagnostic: None,
        }
    }

    #[test]
    fn test_api_assessment_labels_and_formatting() {
        let api = ApiAssessment::from(&sample_assessment());

        assert_eq!(api.alternatives.len(), 2);
        assert_eq!(api.alternatives[0].label, "Route 1");
        assert_eq!(api.alternatives[1].label, "Route 2");

        let safest = api.safest.unwrap();
        assert_eq!(safest.formatted_time, "0 days, 0 hours, 45 minutes");
        assert_eq!(safest.points, vec![[12.97, 77.59]]);

        assert_eq!(api.source_weather.condition, "Clouds");
        assert_eq!(api.source_weather.temperature, "27.4");
        assert_eq!(api.destination_weather.condition, "Unavailable");
        assert_eq!(api.destination_weather.temperature, "N/A");
    }

    #[test]
    fn test_api_assessment_without_safe_route() {
        let mut assessment = sample_assessment();
        assessment.safest = None;
        assessment.routing_diagnostic = Some("routing service answered 502".to_string());

        let api = ApiAssessment::from(&assessment);
        assert!(api.safest.is_none());
        assert_eq!(api.alternatives.len(), 2);
        assert!(api.routing_diagnostic.unwrap().contains("502"));
    }
}
