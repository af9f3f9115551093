//! API contracts for the Cropcase storefront.
//!
//! This crate defines the "language" the client and the storefront backend
//! speak:
//!
//! - **Types** ([`Case`], [`RewardItem`], [`OpenResult`], etc.) — the JSON
//!   shapes that travel over the REST boundary.
//! - **Codec** ([`decode`], [`rejection`]) — how raw response bytes become
//!   typed values, and how error bodies become readable messages.
//! - **Errors** ([`ProtocolError`]) — what can go wrong between bytes and
//!   shapes.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and session
//! (identity and tokens). It doesn't know about tokens, retries, or balance
//! rules — it only knows what the wire looks like.
//!
//! ```text
//! Transport (bytes) → Protocol (typed shapes) → Session / Opening (rules)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{decode, rejection};
pub use error::ProtocolError;
pub use types::{
    Account, BalanceReceipt, Case, CaseId, EntryId, InventoryEntry, ItemId, OpenResult, Profile,
    Rarity, RewardItem, TokenPair, TokenRefresh, User, UserId,
};
