//! Error types and handling for the `RouteSafe` application

use thiserror::Error;

/// Main error type for the `RouteSafe` application
#[derive(Error, Debug)]
pub enum RouteSafeError {
    /// A place name could not be resolved to coordinates
    #[error("no coordinates found for '{place}'")]
    GeocodeNotFound { place: String },

    /// An external service answered with a non-success status
    #[error("{service} request failed with status {status}: {body}")]
    Provider {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Network or timeout failure before a response was received
    #[error("transport error: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// Classifier artifact loading or prediction errors
    #[error("classifier error: {message}")]
    Model { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl RouteSafeError {
    /// Create a new geocode-not-found error
    pub fn geocode_not_found<S: Into<String>>(place: S) -> Self {
        Self::GeocodeNotFound {
            place: place.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(service: &'static str, status: u16, body: S) -> Self {
        Self::Provider {
            service,
            status,
            body: body.into(),
        }
    }

    /// Create a new classifier error
    pub fn model<S: Into<String>>(message: S) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RouteSafeError::GeocodeNotFound { place } => {
                format!("Could not find coordinates for '{place}'. Please check the spelling.")
            }
            RouteSafeError::Provider {
                service,
                status,
                body,
            } => {
                format!("The {service} service answered with status {status}: {body}")
            }
            RouteSafeError::Transport { .. } => {
                "Unable to reach external services. Please check your internet connection."
                    .to_string()
            }
            RouteSafeError::Model { message } => {
                format!("Classifier error: {message}")
            }
            RouteSafeError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            RouteSafeError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let not_found = RouteSafeError::geocode_not_found("Atlantis");
        assert!(matches!(not_found, RouteSafeError::GeocodeNotFound { .. }));

        let provider = RouteSafeError::provider("routing", 503, "upstream down");
        assert!(matches!(
            provider,
            RouteSafeError::Provider { status: 503, .. }
        ));

        let model = RouteSafeError::model("artifact missing");
        assert!(matches!(model, RouteSafeError::Model { .. }));
    }

    #[test]
    fn test_user_messages() {
        let not_found = RouteSafeError::geocode_not_found("Atlantis");
        assert!(not_found.user_message().contains("Atlantis"));

        let provider = RouteSafeError::provider("routing", 500, "boom");
        assert!(provider.user_message().contains("routing"));
        assert!(provider.user_message().contains("boom"));

        let config = RouteSafeError::config("missing key");
        assert!(config.user_message().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RouteSafeError = io_err.into();
        assert!(matches!(err, RouteSafeError::Io { .. }));
    }
}
