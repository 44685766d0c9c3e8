//! Error types and handling for the `Daytrip` application

use thiserror::Error;

/// Main error type for the `Daytrip` application
///
/// Every failure carries a stable kind so callers can branch on it instead
/// of pattern-matching message text.
#[derive(Error, Debug)]
pub enum DaytripError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network transport errors (timeouts, connection failures)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Provider answered, but with a non-success status or an empty result set
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Provider response could not be parsed into the expected shape
    #[error("Malformed response: {message}")]
    Malformed { message: String },

    /// The input was not sufficient to carry out the operation
    #[error("Insufficient input: {message}")]
    InsufficientInput { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DaytripError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Create a new insufficient-input error
    pub fn insufficient_input<S: Into<String>>(message: S) -> Self {
        Self::InsufficientInput {
            message: message.into(),
        }
    }

    /// Stable machine-readable kind, used in serialized error payloads
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DaytripError::Config { .. } => "config",
            DaytripError::Transport { .. } => "transport",
            DaytripError::NotFound { .. } => "not-found",
            DaytripError::Malformed { .. } => "malformed-response",
            DaytripError::InsufficientInput { .. } => "insufficient-input",
            DaytripError::Io { .. } => "io",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DaytripError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            DaytripError::Transport { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            DaytripError::NotFound { message } => message.clone(),
            DaytripError::Malformed { .. } => {
                "Received an unexpected response from an external service.".to_string()
            }
            DaytripError::InsufficientInput { message } => {
                format!("Insufficient input: {message}")
            }
            DaytripError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for DaytripError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DaytripError::malformed(err.to_string())
        } else {
            DaytripError::transport(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for DaytripError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => DaytripError::transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for DaytripError {
    fn from(err: serde_json::Error) -> Self {
        DaytripError::malformed(err.to_string())
    }
}
