//! Gateway error types
use serde::Deserialize;
use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure of a list, create or revoke call. The list controller treats every
/// variant the same way; the variants only keep transport detail for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request rejected ({status}): {key}")]
    Rejected { status: u16, key: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error body returned by the vending API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl GatewayError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a rejection carrying a message key
    pub fn rejected(status: u16, key: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            key: key.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a rejection from a non-success response. The backend's own
    /// message key wins over the status-derived one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let key = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail.or(b.error))
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| status_key(status).to_string());

        Self::Rejected { status, key }
    }

    /// Key handed to the message catalog for display
    pub fn message_key(&self) -> &str {
        match self {
            GatewayError::Network(_) => "network-error",
            GatewayError::Timeout => "network-timeout",
            GatewayError::Rejected { key, .. } => key,
            GatewayError::InvalidResponse(_) => "invalid-response",
            GatewayError::Configuration(_) => "configuration-error",
        }
    }

    /// Check if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(self, GatewayError::Network(_) | GatewayError::Timeout)
    }
}

fn status_key(status: u16) -> &'static str {
    match status {
        401 | 403 => "not-authorized",
        404 => "app-not-found",
        400..=499 => "request-rejected",
        _ => "server-error",
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
