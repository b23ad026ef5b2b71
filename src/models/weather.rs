//! Weather snapshot model and display methods

use serde::{Deserialize, Serialize};

/// Condition label used when no real reading is available.
pub const UNAVAILABLE_CONDITION: &str = "Unavailable";

/// Label standing in for a missing numeric reading.
pub const MISSING_READING: &str = "N/A";

/// Coarse weather reading at one coordinate.
///
/// A missing reading is a valid value, not an error: the weather
/// client degrades to [`WeatherSnapshot::unavailable`] instead of
/// failing its caller, and `None` fields render as "N/A".
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Condition label, e.g. "Clouds" or "Rain"
    pub condition: String,
    /// Temperature in degrees Celsius
    pub temperature: Option<f64>,
    /// Visibility in meters, as reported by the provider
    pub visibility: Option<f64>,
}

impl WeatherSnapshot {
    /// Create a snapshot with real readings
    #[must_use]
    pub fn new(condition: String, temperature: Option<f64>, visibility: Option<f64>) -> Self {
        Self {
            condition,
            temperature,
            visibility,
        }
    }

    /// The sentinel snapshot returned when the provider cannot be reached
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            condition: UNAVAILABLE_CONDITION.to_string(),
            temperature: None,
            visibility: None,
        }
    }

    /// Whether this snapshot is the sentinel rather than a real reading
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.condition == UNAVAILABLE_CONDITION
            && self.temperature.is_none()
            && self.visibility.is_none()
    }

    /// Temperature for display, "N/A" when missing
    #[must_use]
    pub fn temperature_label(&self) -> String {
        self.temperature
            .map_or_else(|| MISSING_READING.to_string(), |t| format!("{t:.1}"))
    }

    /// Visibility for display, "N/A" when missing
    #[must_use]
    pub fn visibility_label(&self) -> String {
        self.visibility
            .map_or_else(|| MISSING_READING.to_string(), |v| format!("{v:.0}"))
    }
}
