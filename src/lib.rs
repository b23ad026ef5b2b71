//! `RouteSafe` - route safety assessment between two places
//!
//! This library geocodes a source and destination, fetches weather at
//! both endpoints, requests alternative driving routes, scores each
//! route with a pre-trained classifier and selects the fastest route
//! among those labeled safe.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geocode;
pub mod models;
pub mod pipeline;
pub mod routing;
pub mod scorer;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::RouteSafeConfig;
pub use error::RouteSafeError;
pub use geocode::GeocoderClient;
pub use models::{Coordinate, Route, ScoredRoute, WeatherSnapshot};
pub use pipeline::{format_travel_time, select_safest, Pipeline, RouteAssessment, SessionState};
pub use routing::RoutingClient;
pub use scorer::{ClassifierArtifact, RiskScorer};
pub use weather::WeatherClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RouteSafeError>;
