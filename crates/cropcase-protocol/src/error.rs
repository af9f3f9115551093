//! Error types for the protocol layer.
//!
//! Each crate in Cropcase defines its own error enum. When you see a
//! `ProtocolError`, the problem is between bytes and typed shapes — not in
//! networking (that's `TransportError`) and not in session or balance rules.

/// Errors that can occur while interpreting a backend response.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The response body couldn't be parsed into the expected shape.
    ///
    /// Common causes: malformed JSON, missing required fields, a backend
    /// deploy that changed a contract.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The server answered, and the answer was "no".
    ///
    /// The message is extracted from the backend's error body and is meant
    /// to be shown to the user verbatim; the status is kept for callers
    /// that branch on the class of rejection.
    #[error("{message}")]
    Rejected {
        /// HTTP status of the rejecting response.
        status: u16,
        /// Human-readable reason, best-effort extracted from the body.
        message: String,
    },
}
