//! Gateway error taxonomy.
//!
//! The state managers do not distinguish the variants in their rollback
//! logic - any failure of a cart-mutating request triggers the same
//! rollback path - but the variants matter for logging and for the view
//! layer's notices.

use thiserror::Error;

/// Maximum number of characters of a response body carried in an error.
const BODY_SNIPPET_LEN: usize = 200;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (unreachable host, connection reset).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request (validation failure, invalid
    /// credentials, conflict).
    #[error("request rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be constructed from the configured base.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Truncate a response body for logs and error messages.
pub(crate) fn body_snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}
