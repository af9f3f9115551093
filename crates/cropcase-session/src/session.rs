//! Session types: the data that represents "who is logged in".
//!
//! A session is the client's record of an authenticated user. It tracks:
//! - WHO the user is (their [`User`] identity)
//! - HOW to act on their behalf (the access/refresh token pair)
//! - WHAT they can spend (the last server-confirmed coin balance)

use serde::{Deserialize, Serialize};

use cropcase_protocol::User;

use std::fmt;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of the client's (single) session slot.
///
/// ```text
///   Anonymous ──(login)──→ Authenticating ──(ok)──→ Authenticated
///       ↑                        │                        │
///       └──────(rejected)────────┘                        │
///       └────────(logout / refresh failure)───────────────┘
/// ```
///
/// - **Anonymous**: no credentials held. Registration happens here and
///   stays here; a registered user must log in explicitly.
/// - **Authenticating**: a login exchange is in flight. No tokens are
///   stored yet, so nothing gets attached to concurrent requests.
/// - **Authenticated**: tokens and a cached profile are held; authorized
///   calls are possible.
///
/// `Anonymous → Authenticated` directly is also legal: it's the restore
/// path, when a persisted session is loaded back from the durable store at
/// startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Authenticating,
    Authenticated,
}

impl SessionPhase {
    /// Returns `true` if credentials are currently held.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Anonymous, Self::Authenticating)
                | (Self::Anonymous, Self::Authenticated)
                | (Self::Authenticating, Self::Authenticated)
                | (Self::Authenticating, Self::Anonymous)
                | (Self::Authenticated, Self::Anonymous)
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Authenticating => write!(f, "Authenticating"),
            Self::Authenticated => write!(f, "Authenticated"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The full session record: tokens, identity, and cached balance.
///
/// This is what the [`SessionStore`](crate::SessionStore) persists, so it
/// derives serde. It never crosses the crate boundary by reference — the
/// manager hands out token-free [`SessionView`] snapshots instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Short-lived bearer token attached to authorized requests.
    pub access: String,

    /// Long-lived token exchanged for a new access token on expiry.
    pub refresh: String,

    /// The authenticated user's identity.
    pub user: User,

    /// The most recent server-confirmed coin balance. Never predicted,
    /// never locally incremented: every write originates from a
    /// `new_balance` the backend sent.
    pub balance: u64,
}

// ---------------------------------------------------------------------------
// SessionView
// ---------------------------------------------------------------------------

/// A read-only snapshot of the session, safe to hand to any component.
///
/// Carries identity and balance but no tokens; cloning it grants no
/// authority. Snapshots don't update — re-read from the manager after any
/// operation that could move the balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    user: User,
    balance: u64,
}

impl SessionView {
    pub(crate) fn of(session: &Session) -> Self {
        Self {
            user: session.user.clone(),
            balance: session.balance,
        }
    }

    /// The authenticated user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The cached, server-confirmed balance at snapshot time.
    pub fn balance(&self) -> u64 {
        self.balance
    }
}

// =========================================================================
// Tests
// =========================================================================
