//! The session manager: owns the client's one session slot.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Exchanging credentials for a token pair (login)
//! - Creating accounts (register, which deliberately does NOT log in)
//! - Attaching the access token to outbound requests
//! - Running the one-shot refresh-and-retry protocol on 401 responses
//! - Tearing the session down when the refresh token is dead
//! - Persisting the session across process restarts
//!
//! # Single-writer discipline
//!
//! The manager is the only code that mutates session state, including the
//! cached balance. Other layers read through [`SessionView`] snapshots and
//! ask the manager to [`apply_balance`](SessionManager::apply_balance) when
//! the server confirms a new value. That discipline is what makes "the
//! displayed balance is always a server-confirmed value" enforceable.
//!
//! # Concurrency note
//!
//! Session state lives in a `std::sync::RwLock` that is never held across
//! an await point; the async lock in this module is the *refresh gate*,
//! which serializes concurrent refresh attempts (see
//! [`send_authorized`](SessionManager::send_authorized)).

use std::sync::{Arc, RwLock};

use cropcase_protocol::{self as protocol, Account, TokenPair, TokenRefresh};
use cropcase_transport::{ApiRequest, ApiResponse, Backend};
use tokio::sync::Mutex;

use crate::{Session, SessionError, SessionPhase, SessionStore, SessionView};

/// The one mutable slot: which phase we're in, and the session if any.
///
/// Invariant: `session.is_some()` iff `phase == Authenticated`.
struct Slot {
    phase: SessionPhase,
    session: Option<Session>,
}

/// Manages the client's single authenticated session (or the absence of
/// one).
///
/// ## Lifecycle
///
/// ```text
/// restore() ─┐
///            ▼
/// login() ──→ [Authenticated] ──→ logout() ──→ [Anonymous]
///    │             │
///    │             └─(refresh token rejected)──→ [Anonymous]
///    └─(rejected)──→ [Anonymous]
/// ```
pub struct SessionManager<B: Backend> {
    backend: Arc<B>,
    store: Box<dyn SessionStore>,
    slot: RwLock<Slot>,

    /// Single-flight guard for the refresh exchange. Concurrent requests
    /// that each hit a 401 queue up here; the first one refreshes, the
    /// rest notice the rotated token and reuse it.
    refresh_gate: Mutex<()>,
}

impl<B: Backend> SessionManager<B> {
    /// Creates a manager, restoring any session the store has persisted.
    ///
    /// An unreadable store is tolerated (the client starts anonymous); it
    /// is a cache of convenience, never a source of truth.
    pub fn new(backend: Arc<B>, store: Box<dyn SessionStore>) -> Self {
        let restored = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "session store unreadable, starting anonymous");
            None
        });

        let phase = if restored.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        };
        if let Some(session) = &restored {
            tracing::info!(user = %session.user.id, "session restored from store");
        }

        Self {
            backend,
            store,
            slot: RwLock::new(Slot {
                phase,
                session: restored,
            }),
            refresh_gate: Mutex::new(()),
        }
    }

    // -- Read access --------------------------------------------------------

    /// The current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.slot.read().expect("session lock poisoned").phase
    }

    /// Returns `true` if a session is held.
    pub fn is_authenticated(&self) -> bool {
        self.phase().is_authenticated()
    }

    /// A read-only snapshot of the current session, if any.
    pub fn current(&self) -> Option<SessionView> {
        self.slot
            .read()
            .expect("session lock poisoned")
            .session
            .as_ref()
            .map(SessionView::of)
    }

    /// The cached server-confirmed balance, if a session is held.
    pub fn balance(&self) -> Option<u64> {
        self.slot
            .read()
            .expect("session lock poisoned")
            .session
            .as_ref()
            .map(|s| s.balance)
    }

    fn access_token(&self) -> Option<String> {
        self.slot
            .read()
            .expect("session lock poisoned")
            .session
            .as_ref()
            .map(|s| s.access.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.slot
            .read()
            .expect("session lock poisoned")
            .session
            .as_ref()
            .map(|s| s.refresh.clone())
    }

    // -- Lifecycle operations -----------------------------------------------

    /// Logs in with a username and password.
    ///
    /// On success the token pair is stored, the user's profile is fetched,
    /// and the session is persisted. An existing session is replaced.
    ///
    /// # Errors
    /// - [`SessionError::InvalidCredentials`] when the backend rejects the
    ///   pair.
    /// - Transport/protocol errors pass through; in every failure case the
    ///   manager lands back in `Anonymous` with nothing half-stored.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionView, SessionError> {
        if self.is_authenticated() {
            tracing::info!("replacing existing session");
            self.logout();
        }
        self.slot.write().expect("session lock poisoned").phase = SessionPhase::Authenticating;

        match self.exchange_credentials(username, password).await {
            Ok(session) => {
                let view = SessionView::of(&session);
                self.install(session);
                Ok(view)
            }
            Err(e) => {
                let mut slot = self.slot.write().expect("session lock poisoned");
                slot.phase = SessionPhase::Anonymous;
                slot.session = None;
                Err(e)
            }
        }
    }

    /// The network half of login: token exchange, then profile fetch.
    async fn exchange_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, SessionError> {
        let login = ApiRequest::post(
            "/auth/login/",
            serde_json::json!({ "username": username, "password": password }),
        );
        let response = self.backend.execute(login).await?;
        if response.is_unauthorized() {
            return Err(SessionError::InvalidCredentials);
        }
        if !response.is_success() {
            return Err(protocol::rejection(&response).into());
        }
        let tokens: TokenPair = protocol::decode(&response)?;

        // The login response carries only tokens; identity and balance come
        // from /auth/me/. The session isn't installed yet, so the bearer is
        // attached by hand.
        let me = ApiRequest::get("/auth/me/").with_bearer(&tokens.access);
        let response = self.backend.execute(me).await?;
        if !response.is_success() {
            return Err(protocol::rejection(&response).into());
        }
        let account: Account = protocol::decode(&response)?;

        Ok(Session {
            access: tokens.access,
            refresh: tokens.refresh,
            user: account.user,
            balance: account.profile.balance,
        })
    }

    /// Creates a new account.
    ///
    /// Does NOT authenticate: the caller must [`login`](Self::login)
    /// afterwards, exactly as the backend's registration flow expects. The
    /// session slot is never touched, whatever the outcome.
    ///
    /// # Errors
    /// - [`SessionError::Conflict`] when the backend rejects the
    ///   registration (taken username, invalid field).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let request = ApiRequest::post(
            "/auth/register/",
            serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }),
        );
        let response = self.backend.execute(request).await?;

        if response.is_success() {
            tracing::info!(username, "account registered");
            return Ok(());
        }
        match response.status {
            400 | 409 => Err(SessionError::Conflict(rejection_message(&response))),
            _ => Err(protocol::rejection(&response).into()),
        }
    }

    /// Clears all session state, memory and durable store alike.
    ///
    /// Unconditional and idempotent: logging out while anonymous is a no-op.
    pub fn logout(&self) {
        let had_session = {
            let mut slot = self.slot.write().expect("session lock poisoned");
            let had = slot.session.take().is_some();
            slot.phase = SessionPhase::Anonymous;
            had
        };
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        if had_session {
            tracing::info!("logged out");
        }
    }

    // -- Request pipeline ---------------------------------------------------

    /// Decorates a request with the current access token, if a session
    /// exists. No-op otherwise.
    pub fn attach(&self, request: ApiRequest) -> ApiRequest {
        match self.access_token() {
            Some(token) => request.with_bearer(token),
            None => request,
        }
    }

    /// Sends a request that works with or without credentials (e.g. the
    /// case catalog).
    ///
    /// When a session is held this is exactly [`send_authorized`]
    /// (credentials attached, refresh protocol armed); otherwise the
    /// request goes out bare.
    ///
    /// [`send_authorized`]: Self::send_authorized
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SessionError> {
        if self.is_authenticated() {
            self.send_authorized(request).await
        } else {
            Ok(self.backend.execute(request).await?)
        }
    }

    /// Sends a request that requires credentials, running the one-shot
    /// refresh-and-retry protocol on a 401.
    ///
    /// The protocol, in full:
    /// 1. Attach the current access token and send.
    /// 2. On a 401 with `attempt == 0`: run the refresh exchange (single
    ///    flight, see below), then re-send once with `attempt = 1` and the
    ///    fresh token.
    /// 3. A 401 on the retried request is returned to the caller as-is.
    ///    The retry budget lives on the request value itself, so there is
    ///    no path that loops.
    ///
    /// Concurrent requests that each hit a 401 serialize on the refresh
    /// gate; whichever gets there first performs the exchange and the rest
    /// reuse the rotated token. (One refresh call total, by design; the
    /// tests pin this.)
    ///
    /// # Errors
    /// - [`SessionError::NotAuthenticated`] if no session is held (the
    ///   request is not sent).
    /// - [`SessionError::RefreshExpired`] if the refresh exchange was
    ///   rejected; the session is gone afterwards.
    pub async fn send_authorized(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse, SessionError> {
        let token = self.access_token().ok_or(SessionError::NotAuthenticated)?;

        let response = self
            .backend
            .execute(request.clone().with_bearer(token.clone()))
            .await?;

        if !response.is_unauthorized() || request.attempt > 0 {
            return Ok(response);
        }

        tracing::debug!(request = %request, "access token rejected, refreshing");
        let fresh = self.refresh_access(&token).await?;

        let retry = request.retried().with_bearer(fresh);
        Ok(self.backend.execute(retry).await?)
    }

    /// The refresh exchange, serialized by the refresh gate.
    ///
    /// `stale_access` is the token the caller just saw rejected. If, once
    /// the gate is acquired, the slot holds a *different* access token,
    /// another request already refreshed while we waited; reuse its result
    /// instead of spending the refresh token again.
    async fn refresh_access(&self, stale_access: &str) -> Result<String, SessionError> {
        let _gate = self.refresh_gate.lock().await;

        match self.access_token() {
            Some(current) if current != stale_access => {
                tracing::debug!("reusing token rotated by a concurrent refresh");
                return Ok(current);
            }
            Some(_) => {}
            // The session vanished while we waited: a concurrent refresh
            // failed and tore it down, or the user logged out.
            None => return Err(SessionError::RefreshExpired),
        }

        let Some(refresh) = self.refresh_token() else {
            self.teardown("no refresh token held");
            return Err(SessionError::RefreshExpired);
        };

        let request = ApiRequest::post("/auth/refresh/", serde_json::json!({ "refresh": refresh }));
        // A transport failure here proves nothing about the token, so the
        // session survives; only a definitive rejection tears it down.
        let response = self.backend.execute(request).await?;
        if !response.is_success() {
            self.teardown("refresh token rejected by backend");
            return Err(SessionError::RefreshExpired);
        }

        let rotated: TokenRefresh = protocol::decode(&response)?;
        let access = rotated.access.clone();
        self.rotate_tokens(rotated);
        tracing::debug!("access token refreshed");
        Ok(access)
    }

    // -- State writes -------------------------------------------------------

    /// Replaces the cached balance with a server-confirmed value.
    ///
    /// This is the ONLY balance write path in the client. Callers hand in
    /// the `new_balance` a response carried; nothing ever adds or
    /// subtracts locally. No-op when anonymous (e.g. the session was torn
    /// down between request and settlement).
    pub fn apply_balance(&self, new_balance: u64) {
        let updated = {
            let mut slot = self.slot.write().expect("session lock poisoned");
            match &mut slot.session {
                Some(session) => {
                    let old = session.balance;
                    session.balance = new_balance;
                    Some((old, session.clone()))
                }
                None => None,
            }
        };
        if let Some((old, session)) = updated {
            tracing::debug!(old, new = new_balance, "balance confirmed by server");
            self.persist(&session);
        }
    }

    fn install(&self, session: Session) {
        tracing::info!(user = %session.user.id, username = %session.user.username, "logged in");
        self.persist(&session);
        let mut slot = self.slot.write().expect("session lock poisoned");
        slot.phase = SessionPhase::Authenticated;
        slot.session = Some(session);
    }

    fn rotate_tokens(&self, rotated: TokenRefresh) {
        let session = {
            let mut slot = self.slot.write().expect("session lock poisoned");
            match &mut slot.session {
                Some(session) => {
                    session.access = rotated.access;
                    if let Some(refresh) = rotated.refresh {
                        session.refresh = refresh;
                    }
                    Some(session.clone())
                }
                None => None,
            }
        };
        if let Some(session) = session {
            self.persist(&session);
        }
    }

    fn teardown(&self, reason: &str) {
        tracing::warn!(reason, "tearing down session");
        self.logout();
    }

    fn persist(&self, session: &Session) {
        // Persistence is best-effort: an unwritable store degrades to
        // "log in again next launch", never to a failed operation.
        if let Err(e) = self.store.save(session) {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }
}

/// Extracts the display message from a rejection response.
fn rejection_message(response: &ApiResponse) -> String {
    match protocol::rejection(response) {
        cropcase_protocol::ProtocolError::Rejected { message, .. } => message,
        other => other.to_string(),
    }
}

// =========================================================================
// Tests
// =========================================================================
