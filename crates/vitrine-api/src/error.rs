//! Error types for storefront API operations.

use thiserror::Error;

/// Error type for all storefront API operations.
///
/// Every variant reads as "remote unavailable" to fallback-capable
/// callers; the distinction matters only for logging.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or transport-level HTTP error from reqwest.
    ///
    /// Includes connection failures, timeouts, and TLS errors.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storefront returned a non-success HTTP status.
    #[error("Storefront error: {status} - {message}")]
    Status {
        /// The HTTP status code returned by the storefront.
        status: u16,
        /// The response body, typically containing error details.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration or initialization error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type alias for storefront API operations.
pub type ApiResult<T> = Result<T, ApiError>;
