//! Error types for tempdash-core.
//!
//! Every backend call returns [`Result`]. The variants map onto the three
//! failure classes the dashboard distinguishes:
//!
//! | Failure | Variant | Dashboard reaction |
//! |---------|---------|--------------------|
//! | Transport (refused, timeout, DNS) | [`ClientError::NotReachable`] | sentinel text / alert / apology |
//! | Non-OK HTTP status | [`ClientError::ApiError`] | same, message taken from `{error}` |
//! | Undecodable body | [`ClientError::Request`] | same |
//!
//! None of them is retried. Polling loops simply try again on their next tick.

/// Error type for backend client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend is not reachable.
    #[error("Backend not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request failed (including body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

impl ClientError {
    /// HTTP status of an error response, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the request never reached the backend.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::NotReachable { .. } => true,
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// Result type for backend client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
