//! `Storefront` builder and facade.
//!
//! This is the entry point for using the SDK. It ties the layers together:
//! transport → protocol → session → reveal, plus the supporting flows
//! (catalog, inventory and liquidation, deposits) that don't warrant a
//! crate of their own.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cropcase_protocol::{
    self as protocol, BalanceReceipt, Case, CaseId, EntryId, InventoryEntry, Profile,
};
use cropcase_reveal::{CaseOpener, OpeningPhase, ResultPanel, RevealConfig, SettledOpen};
use cropcase_session::{
    FileSessionStore, SessionManager, SessionPhase, SessionStore, SessionView,
};
use cropcase_timer::{Clock, TokioClock};
use cropcase_transport::{ApiRequest, Backend, HttpBackend, HttpConfig};

use crate::StorefrontError;

/// Smallest accepted deposit, in coins.
pub const DEPOSIT_MIN: u64 = 1;

/// Largest accepted deposit, in coins. The server enforces its own
/// ceiling independently; this bound just short-circuits obvious rejects.
pub const DEPOSIT_MAX: u64 = 5_000;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Storefront`].
///
/// # Example
///
/// ```rust,no_run
/// use cropcase::prelude::*;
///
/// # fn run() -> Result<(), StorefrontError> {
/// let store = Storefront::builder()
///     .base_url("https://cropcase.example.com/api")
///     .timeout(std::time::Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct StorefrontBuilder {
    http: HttpConfig,
    reveal: RevealConfig,
    store: Option<Box<dyn SessionStore>>,
}

impl StorefrontBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            http: HttpConfig::default(),
            reveal: RevealConfig::default(),
            store: None,
        }
    }

    /// Sets the storefront API base URL.
    pub fn base_url(mut self, url: &str) -> Self {
        self.http.base_url = url.to_string();
        self
    }

    /// Sets the per-request HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }

    /// Overrides the reveal animation configuration.
    pub fn reveal_config(mut self, config: RevealConfig) -> Self {
        self.reveal = config;
        self
    }

    /// Overrides the durable session store.
    ///
    /// Defaults to the platform file store
    /// ([`FileSessionStore::at_default_location`]).
    pub fn session_store(mut self, store: impl SessionStore) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Builds the client over real HTTP and the real clock.
    ///
    /// Restores any persisted session; no network traffic happens here.
    pub fn build(self) -> Result<Storefront<HttpBackend, TokioClock>, StorefrontError> {
        let backend = Arc::new(HttpBackend::new(self.http)?);
        let store = match self.store {
            Some(store) => store,
            None => Box::new(FileSessionStore::at_default_location()?),
        };
        Ok(Storefront::with_parts(backend, store, TokioClock, self.reveal))
    }
}

impl Default for StorefrontBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Storefront
// ---------------------------------------------------------------------------

/// The Cropcase client: one authenticated session (or none), a case
/// catalog, the opening orchestrator, and the inventory/wallet flows.
///
/// Generic over [`Backend`] and [`Clock`] so tests drive it with scripted
/// fakes; production code uses [`Storefront::builder`] and never names the
/// type parameters.
pub struct Storefront<B: Backend, C: Clock> {
    session: Arc<SessionManager<B>>,
    opener: CaseOpener<B, C>,

    /// Read-through cache of `/inventory/`. Invalidated whenever the
    /// backend's copy must have changed: after an open, a sale, a logout.
    inventory: Mutex<Option<Vec<InventoryEntry>>>,
}

impl Storefront<HttpBackend, TokioClock> {
    /// Creates a new builder.
    pub fn builder() -> StorefrontBuilder {
        StorefrontBuilder::new()
    }
}

impl<B: Backend, C: Clock> Storefront<B, C> {
    /// Assembles a client from explicit parts. This is the seam tests use
    /// to inject a scripted backend and a hand-driven clock.
    pub fn with_parts(
        backend: Arc<B>,
        store: Box<dyn SessionStore>,
        clock: C,
        reveal: RevealConfig,
    ) -> Self {
        let session = Arc::new(SessionManager::new(backend, store));
        let opener = CaseOpener::new(Arc::clone(&session), clock, reveal);
        Self {
            session,
            opener,
            inventory: Mutex::new(None),
        }
    }

    // -- Session ------------------------------------------------------------

    /// Logs in and caches the user's profile. See
    /// [`SessionManager::login`].
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionView, StorefrontError> {
        Ok(self.session.login(username, password).await?)
    }

    /// Creates an account. Does not log in; call [`login`](Self::login)
    /// next.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), StorefrontError> {
        Ok(self.session.register(username, email, password).await?)
    }

    /// Logs out: clears the session (memory and durable store) and drops
    /// the inventory cache, since it belonged to that user.
    pub fn logout(&self) {
        self.session.logout();
        self.invalidate_inventory();
    }

    /// The current session lifecycle phase.
    pub fn session_phase(&self) -> SessionPhase {
        self.session.phase()
    }

    /// A read-only snapshot of the session, if logged in.
    pub fn session(&self) -> Option<SessionView> {
        self.session.current()
    }

    /// The cached server-confirmed balance, if logged in.
    pub fn balance(&self) -> Option<u64> {
        self.session.balance()
    }

    // -- Catalog ------------------------------------------------------------

    /// Fetches the case catalog. Works anonymously; credentials are
    /// attached when held.
    pub async fn cases(&self) -> Result<Vec<Case>, StorefrontError> {
        let response = self.session.send(ApiRequest::get("/cases/")).await?;
        if !response.is_success() {
            return Err(protocol::rejection(&response).into());
        }
        Ok(protocol::decode(&response)?)
    }

    /// Fetches a single case by id.
    pub async fn case(&self, id: CaseId) -> Result<Case, StorefrontError> {
        let response = self
            .session
            .send(ApiRequest::get(format!("/cases/{}/", id.0)))
            .await?;
        if !response.is_success() {
            return Err(protocol::rejection(&response).into());
        }
        Ok(protocol::decode(&response)?)
    }

    // -- Opening ------------------------------------------------------------

    /// Opens a case: the authoritative transaction plus its reveal. See
    /// [`CaseOpener::open`] for the protocol and failure semantics.
    ///
    /// On success the inventory cache is invalidated; the won item is in
    /// the backend's copy now.
    pub async fn open_case(&self, case: &Case) -> Result<SettledOpen, StorefrontError> {
        let settled = self.opener.open(case).await?;
        self.invalidate_inventory();
        Ok(settled)
    }

    /// The UI's `opening` flag.
    pub fn is_opening(&self) -> bool {
        self.opener.is_opening()
    }

    /// Where the open flow currently is.
    pub fn opening_phase(&self) -> OpeningPhase {
        self.opener.phase()
    }

    /// The auto-dismissing result panel.
    pub fn result_panel(&self) -> Arc<ResultPanel> {
        self.opener.panel()
    }

    // -- Inventory & liquidation ---------------------------------------------

    /// The user's inventory, served from cache when warm.
    pub async fn inventory(&self) -> Result<Vec<InventoryEntry>, StorefrontError> {
        if let Some(cached) = self
            .inventory
            .lock()
            .expect("inventory lock poisoned")
            .clone()
        {
            return Ok(cached);
        }
        self.refresh_inventory().await
    }

    /// Forces a reload of the inventory from the backend.
    pub async fn refresh_inventory(&self) -> Result<Vec<InventoryEntry>, StorefrontError> {
        let response = self
            .session
            .send_authorized(ApiRequest::get("/inventory/"))
            .await?;
        if !response.is_success() {
            return Err(protocol::rejection(&response).into());
        }
        let entries: Vec<InventoryEntry> = protocol::decode(&response)?;
        *self.inventory.lock().expect("inventory lock poisoned") = Some(entries.clone());
        Ok(entries)
    }

    /// Sells one unit from an inventory entry.
    ///
    /// On success the server's `new_balance` is applied and the inventory
    /// cache is invalidated. A failed sale changes nothing on the client.
    pub async fn sell(&self, entry: EntryId) -> Result<BalanceReceipt, StorefrontError> {
        let request = ApiRequest::post_empty(format!("/inventory/{}/sell/", entry.0));
        let response = self.session.send_authorized(request).await?;
        if !response.is_success() {
            return Err(protocol::rejection(&response).into());
        }
        let receipt: BalanceReceipt = protocol::decode(&response)?;
        tracing::info!(entry = %entry, new_balance = receipt.new_balance, "item sold");
        self.session.apply_balance(receipt.new_balance);
        self.invalidate_inventory();
        Ok(receipt)
    }

    // -- Wallet --------------------------------------------------------------

    /// Deposits coins.
    ///
    /// Client-enforced bounds: `1 ≤ amount ≤ 5000`
    /// ([`DEPOSIT_MIN`]/[`DEPOSIT_MAX`]); amounts outside are rejected
    /// before any request is sent. On success the displayed balance is
    /// replaced wholesale by the server's `new_balance` — never locally
    /// incremented, so client and server can't drift.
    pub async fn deposit(&self, amount: u64) -> Result<BalanceReceipt, StorefrontError> {
        if !(DEPOSIT_MIN..=DEPOSIT_MAX).contains(&amount) {
            return Err(StorefrontError::InvalidAmount {
                amount,
                min: DEPOSIT_MIN,
                max: DEPOSIT_MAX,
            });
        }
        let request = ApiRequest::post(
            "/profile/deposit/",
            serde_json::json!({ "amount": amount }),
        );
        let response = self.session.send_authorized(request).await?;
        if !response.is_success() {
            return Err(protocol::rejection(&response).into());
        }
        let receipt: BalanceReceipt = protocol::decode(&response)?;
        tracing::info!(amount, new_balance = receipt.new_balance, "deposit confirmed");
        self.session.apply_balance(receipt.new_balance);
        Ok(receipt)
    }

    /// Re-reads the profile (balance) from the backend and applies it.
    pub async fn profile(&self) -> Result<Profile, StorefrontError> {
        let response = self
            .session
            .send_authorized(ApiRequest::get("/profile/"))
            .await?;
        if !response.is_success() {
            return Err(protocol::rejection(&response).into());
        }
        let profile: Profile = protocol::decode(&response)?;
        self.session.apply_balance(profile.balance);
        Ok(profile)
    }

    fn invalidate_inventory(&self) {
        *self.inventory.lock().expect("inventory lock poisoned") = None;
    }
}
