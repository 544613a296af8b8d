//! Error types and handling for `ClimateLens`

use thiserror::Error;

/// Main error type for the `ClimateLens` dashboard
#[derive(Error, Debug)]
pub enum ClimateLensError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Provider communication errors (transport, HTTP status)
    #[error("API error: {message}")]
    Api { message: String },

    /// Provider answered but a required field was missing or not numeric
    #[error("Malformed provider response: {message}")]
    MalformedResponse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Lookup miss in the city registry
    #[error("City not found: {name}")]
    CityNotFound { name: String },
}

impl ClimateLensError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn city_not_found<S: Into<String>>(name: S) -> Self {
        Self::CityNotFound { name: name.into() }
    }

    /// Whether the dashboard may recover from this error by substituting
    /// fallback readings instead of refusing the update.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClimateLensError::Api { .. }
                | ClimateLensError::MalformedResponse { .. }
                | ClimateLensError::Config { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimateLensError::Config { .. } => {
                "Configuration error. Please check your config file and provider credentials."
                    .to_string()
            }
            ClimateLensError::Api { .. } | ClimateLensError::MalformedResponse { .. } => {
                "Unable to reach the weather or air-quality provider. Retrying on next update."
                    .to_string()
            }
            ClimateLensError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ClimateLensError::CityNotFound { name } => {
                format!("Unknown city '{name}'. Please pick one from the list.")
            }
        }
    }
}

impl From<reqwest_middleware::Error> for ClimateLensError {
    fn from(err: reqwest_middleware::Error) -> Self {
        ClimateLensError::api(err.to_string())
    }
}

impl From<reqwest::Error> for ClimateLensError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClimateLensError::malformed(err.to_string())
        } else {
            ClimateLensError::api(err.to_string())
        }
    }
}
