//! Core data models shared across the pipeline

pub mod location;
pub mod route;
pub mod weather;

pub use location::Coordinate;
pub use route::{Route, ScoredRoute};
pub use weather::WeatherSnapshot;
