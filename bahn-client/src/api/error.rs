//! API client error types.

use crate::decode::DecodeError;

/// Errors from an API query.
///
/// Every variant is terminal for the call: nothing is returned and nothing
/// is written to the cache tiers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status code
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected wire format
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}
