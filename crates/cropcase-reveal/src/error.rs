//! Error types for the opening layer.

use cropcase_protocol::ProtocolError;
use cropcase_session::SessionError;

/// Errors that can occur while opening a case.
///
/// The first three variants are client-side fast-fails: they are decided
/// before anything touches the network, and the tests assert exactly that.
/// Everything else passes through from the layers below.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// No session is held. The UI should surface its login flow.
    #[error("you must log in to open cases")]
    MustLogIn,

    /// The cached balance can't cover the case price. Advisory only: the
    /// server enforces the real check, this one just spares a round trip.
    #[error("insufficient funds: balance is {balance}, case costs {price}")]
    InsufficientFunds {
        /// The cached server-confirmed balance at check time.
        balance: u64,
        /// The case's open price.
        price: u64,
    },

    /// Another open is already in flight. One at a time.
    #[error("an open is already in progress")]
    Busy,

    /// Session-layer failure: not authenticated after all, refresh dead,
    /// or the request never completed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The backend rejected the open, or its answer couldn't be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
