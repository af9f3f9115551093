//! Session management for Cropcase.
//!
//! This crate handles the authenticated side of the client:
//!
//! 1. **Lifecycle** — logging in, registering, logging out
//!    ([`SessionManager`], [`SessionPhase`])
//! 2. **Credential attachment** — decorating outbound requests with the
//!    access token
//! 3. **Transparent renewal** — the one-shot refresh-and-retry protocol on
//!    401 responses, with a single-flight guard so concurrent requests
//!    share one refresh
//! 4. **Durability** — persisting the session across process restarts
//!    ([`SessionStore`] trait, file-backed by default)
//!
//! # How it fits in the stack
//!
//! ```text
//! Opening / Facade (above)   ← issue authorized requests, read balance
//!     ↕
//! Session layer (this crate) ← owns tokens, identity, and the balance slot
//!     ↕
//! Protocol + Transport (below) ← typed shapes over raw HTTP
//! ```
//!
//! The manager is the *single writer* for session state. Everything else
//! reads through cloned [`SessionView`] snapshots that carry no tokens.

mod error;
mod manager;
mod session;
mod store;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Session, SessionPhase, SessionView};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
