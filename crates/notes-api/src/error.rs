//! Error types for the notes API client.

use std::fmt;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the notes API itself (an HTTP response was received).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Generic HTTP-level error (5xx, unexpected statuses).
    Http { status: u16, message: String },
    /// Authentication failure (invalid or missing token).
    Auth { message: String },
    /// The requested resource does not exist.
    NotFound { resource: String, id: String },
    /// The service asked us to slow down.
    RateLimit { retry_after: Option<u64> },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, message } => write!(f, "HTTP error {}: {}", status, message),
            ApiError::Auth { message } => write!(f, "Auth error: {}", message),
            ApiError::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            ApiError::RateLimit { retry_after } => match retry_after {
                Some(secs) => write!(f, "Rate limited, retry after {} seconds", secs),
                None => write!(f, "Rate limited"),
            },
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Whether retrying the request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimit { .. } | ApiError::Http { status: 500..=599, .. }
        )
    }

    /// Process exit code associated with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ApiError::Auth { .. } => 2,
            ApiError::RateLimit { .. } => 4,
            ApiError::NotFound { .. } => 5,
            ApiError::Http { .. } => 1,
        }
    }
}

/// Errors from the client: either the API answered with an error, or the
/// request never completed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl Error {
    /// Whether retrying the request might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api(api) => api.is_retryable(),
            Error::Request(err) => err.is_timeout() || err.is_connect(),
        }
    }

    /// Process exit code associated with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Api(api) => api.exit_code(),
            Error::Request(_) => 3,
        }
    }
}
