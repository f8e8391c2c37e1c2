//! Error types and handling for the `farmcast` advisor

use thiserror::Error;

/// Main error type for the `farmcast` advisor
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Forecast provider failures: transport, timeout, HTTP status or undecodable body
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Unknown district name
    #[error("District '{district}' not found.")]
    NotFound { district: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Sensor CSV read/write errors
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
}

impl AdvisorError {
    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new not-found error for a district
    pub fn not_found<S: Into<String>>(district: S) -> Self {
        Self::NotFound {
            district: district.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AdvisorError::Upstream { .. } => {
                "Unable to reach the weather service. Please try again later.".to_string()
            }
            AdvisorError::NotFound { .. } => self.to_string(),
            AdvisorError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            AdvisorError::Validation { message } => format!("Invalid input: {message}"),
            AdvisorError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            AdvisorError::Csv { .. } => {
                "Sensor data file could not be read or written.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdvisorError::upstream(format!("forecast request timed out: {err}"))
        } else if err.is_decode() {
            AdvisorError::upstream(format!("invalid forecast payload: {err}"))
        } else {
            AdvisorError::upstream(err.to_string())
        }
    }
}
