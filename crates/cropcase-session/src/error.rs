//! Error types for the session layer.

use cropcase_protocol::ProtocolError;
use cropcase_transport::TransportError;

/// Errors that can occur during session management.
///
/// These cover the full lifecycle: authentication, registration, credential
/// renewal, and authorized sends. Lower-layer failures pass through
/// transparently so callers see one error type per operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backend rejected the username/password pair.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Registration was rejected, typically because the username is taken.
    /// The message is the backend's own wording.
    #[error("registration rejected: {0}")]
    Conflict(String),

    /// The refresh exchange failed definitively: the stored refresh token
    /// is missing, expired, or revoked. The session has been torn down and
    /// the user must log in again.
    #[error("session expired, please log in again")]
    RefreshExpired,

    /// An authorized operation was attempted with no session held.
    #[error("not logged in")]
    NotAuthenticated,

    /// The request never completed (connectivity, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response couldn't be interpreted, or carried a rejection that
    /// isn't one of the auth-specific cases above.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
