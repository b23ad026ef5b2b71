//! Route and scored-route models

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// One candidate path between two coordinates.
///
/// Points are stored in (latitude, longitude) order and preserve the
/// provider's path ordering. Immutable once produced by the routing
/// client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Route {
    /// Travel time in minutes
    pub travel_time_minutes: f64,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Ordered polyline describing the path
    pub points: Vec<Coordinate>,
}

/// A route paired with its classifier label (0 = safe).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRoute {
    pub route: Route,
    pub label: u32,
}

impl ScoredRoute {
    /// Whether the classifier labeled this route safe
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.label == 0
    }
}
