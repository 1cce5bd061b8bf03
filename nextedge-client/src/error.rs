//! Error types for the smoke-test client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while checking a deployed endpoint
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("Endpoint {url} responded with status {status}")]
    Unhealthy {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Target could not be turned into a URL
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

impl ClientError {
    /// Create an unhealthy error from URL and status code
    pub fn unhealthy(url: impl Into<String>, status: u16) -> Self {
        Self::Unhealthy {
            url: url.into(),
            status,
        }
    }

    /// Check if the endpoint answered with a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Unhealthy { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if the endpoint answered with a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Unhealthy { status, .. } if *status >= 500)
    }

    /// Check if no HTTP response was received at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::RequestFailed(_))
    }
}
