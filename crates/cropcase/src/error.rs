//! Unified error type for the Cropcase SDK.

use cropcase_protocol::ProtocolError;
use cropcase_reveal::OpenError;
use cropcase_session::SessionError;
use cropcase_transport::TransportError;

/// Top-level error that wraps all layer-specific errors.
///
/// When using the `cropcase` facade, you deal with this single type; the
/// `#[from]` attributes let `?` convert layer errors automatically. The
/// only variants born at this level are the facade's own client-side
/// validations.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// The request never completed (connectivity, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response couldn't be decoded, or the server rejected the
    /// operation.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An authentication or session-lifecycle failure.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A case-opening failure (busy, must log in, insufficient funds, or a
    /// wrapped lower-layer error).
    #[error(transparent)]
    Open(#[from] OpenError),

    /// A deposit amount outside the client-enforced bounds. Checked before
    /// any request is sent; the server still enforces its own ceiling.
    #[error("deposit amount {amount} is outside the allowed range {min}..={max}")]
    InvalidAmount {
        /// The rejected amount.
        amount: u64,
        /// Smallest accepted deposit.
        min: u64,
        /// Largest accepted deposit.
        max: u64,
    },

    /// The durable session store could not be set up.
    #[error("session store unavailable: {0}")]
    Store(#[from] std::io::Error),
}
