//! Error types for the transport layer.

use std::time::Duration;

/// Errors that can occur while carrying a request to the backend.
///
/// Note what is *not* here: HTTP rejections. A 4xx/5xx response is returned
/// as data ([`ApiResponse`](crate::ApiResponse)) so the layers above can run
/// their own protocols (refresh-and-retry, rejection parsing). Only failures
/// to complete the round trip at all land in this enum.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The backend could not be reached (DNS, refused connection, broken
    /// socket).
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Any other client-side HTTP failure (invalid URL, protocol error,
    /// body read failure).
    #[error("http request failed: {0}")]
    Http(String),
}
