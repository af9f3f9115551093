//! # Cropcase
//!
//! Client SDK for the Cropcase loot-box storefront: authenticate, hold a
//! coin balance, open randomized-reward cases, and manage an inventory of
//! won items that can be sold back for coins.
//!
//! The crate wires four layers together — transport (HTTP), protocol
//! (typed contracts), session (tokens and identity), and reveal (the
//! case-opening state machine) — behind one [`Storefront`] facade.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cropcase::prelude::*;
//!
//! # async fn run() -> Result<(), StorefrontError> {
//! let store = Storefront::builder()
//!     .base_url("https://cropcase.example.com/api")
//!     .build()?;
//!
//! store.login("ferris", "hunter2").await?;
//!
//! let cases = store.cases().await?;
//! let settled = store.open_case(&cases[0]).await?;
//! println!("won: {:?}", settled.sequence.revealed().name);
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees worth knowing
//!
//! - The displayed balance is always a server-confirmed value; the client
//!   never predicts or locally adjusts it.
//! - At most one case open is in flight; the busy flag is observable via
//!   [`Storefront::is_opening`] and always clears, whatever happens.
//! - A 401 triggers at most one transparent refresh-and-retry; a dead
//!   refresh token tears the session down instead of looping.
//! - The session survives process restarts through a durable store, and
//!   logout wipes it everywhere.

mod client;
mod error;

pub use client::{Storefront, StorefrontBuilder, DEPOSIT_MAX, DEPOSIT_MIN};
pub use error::StorefrontError;

/// One-stop imports for typical use.
pub mod prelude {
    pub use crate::{Storefront, StorefrontBuilder, StorefrontError, DEPOSIT_MAX, DEPOSIT_MIN};

    pub use cropcase_protocol::{
        Account, BalanceReceipt, Case, CaseId, EntryId, InventoryEntry, ItemId, OpenResult,
        Profile, Rarity, RewardItem, User, UserId,
    };
    pub use cropcase_reveal::{
        CaseOpener, OpenError, OpeningPhase, ResultPanel, RevealConfig, RevealSequence,
        SettledOpen,
    };
    pub use cropcase_session::{
        FileSessionStore, MemorySessionStore, SessionError, SessionManager, SessionPhase,
        SessionStore, SessionView,
    };
    pub use cropcase_timer::{Clock, ManualClock, TokioClock};
    pub use cropcase_transport::{
        ApiRequest, ApiResponse, Backend, HttpBackend, HttpConfig, Method, TransportError,
    };
}
