//! The case opener: one user intent, one authoritative transaction.
//!
//! The flow, end to end:
//!
//! 1. Take the busy flag (or fail fast with [`OpenError::Busy`]).
//! 2. Advisory preconditions: a session exists, the cached balance covers
//!    the price. Both are checked before anything touches the network.
//! 3. Phase 1: POST the open. The response carries the authoritative
//!    reward and balance; from here on the outcome is fixed.
//! 4. Build the reveal strip around the authoritative reward.
//! 5. Phase 2: wait out the spin on the injected clock, then commit:
//!    apply the server's balance, present the result panel.
//!
//! Failures anywhere skip the spin, leave balance untouched, and release
//! the busy flag on the way out. There is no automatic retry of a failed
//! open and no cancellation of one in flight: the user re-triggers or
//! waits.

use std::sync::{Arc, Mutex};

use cropcase_protocol::{self as protocol, Case, OpenResult, ProtocolError};
use cropcase_session::SessionManager;
use cropcase_timer::Clock;
use cropcase_transport::{ApiRequest, Backend};

use crate::{OpenError, OpeningPhase, ResultPanel, RevealConfig, RevealSequence};

// ---------------------------------------------------------------------------
// BusyGuard
// ---------------------------------------------------------------------------

/// Drop guard for the `opening` flag.
///
/// Acquiring it moves the phase from `Idle` to `Requesting`; dropping it
/// returns to `Idle`. Because release happens in `Drop`, the flag clears on
/// every exit path: success, error, even a panic inside the open flow.
struct BusyGuard<'a> {
    phase: &'a Mutex<OpeningPhase>,
}

impl<'a> BusyGuard<'a> {
    fn acquire(phase: &'a Mutex<OpeningPhase>) -> Result<Self, OpenError> {
        let mut current = phase.lock().expect("phase lock poisoned");
        if current.is_busy() {
            return Err(OpenError::Busy);
        }
        *current = OpeningPhase::Requesting;
        Ok(Self { phase })
    }

    fn advance(&self, next: OpeningPhase) {
        *self.phase.lock().expect("phase lock poisoned") = next;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        // No expect here: if the flow panicked with the lock poisoned,
        // a second panic in drop would abort.
        if let Ok(mut current) = self.phase.lock() {
            *current = OpeningPhase::Idle;
        }
    }
}

// ---------------------------------------------------------------------------
// SettledOpen
// ---------------------------------------------------------------------------

/// A fully settled open: the authoritative result plus the strip the UI
/// animated to get there.
#[derive(Debug, Clone)]
pub struct SettledOpen {
    /// The server's outcome, exactly as received.
    pub result: OpenResult,

    /// The decorative strip; `sequence.revealed()` is the reward.
    pub sequence: RevealSequence,
}

/// Phase-1 product: the recorded outcome waiting for its spin to finish.
struct PendingReveal {
    outcome: OpenResult,
    sequence: RevealSequence,
}

// ---------------------------------------------------------------------------
// CaseOpener
// ---------------------------------------------------------------------------

/// Orchestrates case opening against the session layer.
///
/// One opener per client. It is internally synchronized; callers share it
/// behind an `Arc` and the busy flag guarantees at most one open in
/// flight.
pub struct CaseOpener<B: Backend, C: Clock> {
    session: Arc<SessionManager<B>>,
    clock: C,
    config: RevealConfig,
    phase: Mutex<OpeningPhase>,
    panel: Arc<ResultPanel>,
}

impl<B: Backend, C: Clock> CaseOpener<B, C> {
    /// Creates an opener over the given session manager and clock.
    pub fn new(session: Arc<SessionManager<B>>, clock: C, config: RevealConfig) -> Self {
        Self {
            session,
            clock,
            config: config.validated(),
            phase: Mutex::new(OpeningPhase::Idle),
            panel: Arc::new(ResultPanel::new()),
        }
    }

    /// The validated reveal configuration in use.
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Current phase of the open flow.
    pub fn phase(&self) -> OpeningPhase {
        *self.phase.lock().expect("phase lock poisoned")
    }

    /// The UI's `opening` flag: `true` while an open is in flight.
    pub fn is_opening(&self) -> bool {
        self.phase().is_busy()
    }

    /// The shared result panel this opener presents into.
    pub fn panel(&self) -> Arc<ResultPanel> {
        Arc::clone(&self.panel)
    }

    /// Opens a case: the single authoritative transaction plus its reveal.
    ///
    /// Returns after the spin duration has elapsed and the balance is
    /// committed. See the module docs for the full protocol.
    ///
    /// # Errors
    /// - [`OpenError::Busy`] — another open is in flight.
    /// - [`OpenError::MustLogIn`] — no session; nothing was sent.
    /// - [`OpenError::InsufficientFunds`] — advisory balance check failed;
    ///   nothing was sent.
    /// - Session/protocol errors — the open failed after hitting the wire;
    ///   balance and panel are untouched.
    pub async fn open(&self, case: &Case) -> Result<SettledOpen, OpenError> {
        let guard = BusyGuard::acquire(&self.phase)?;

        let view = self.session.current().ok_or(OpenError::MustLogIn)?;
        if view.balance() < case.price {
            tracing::debug!(
                case = %case.id,
                balance = view.balance(),
                price = case.price,
                "open rejected client-side: insufficient funds"
            );
            return Err(OpenError::InsufficientFunds {
                balance: view.balance(),
                price: case.price,
            });
        }

        let pending = self.request_open(case).await?;
        guard.advance(OpeningPhase::Revealing);

        Ok(self.settle(pending).await)
        // guard drops here: phase returns to Idle on every path above too.
    }

    /// Phase 1: the authoritative request, and the strip built around its
    /// answer.
    async fn request_open(&self, case: &Case) -> Result<PendingReveal, OpenError> {
        let request = ApiRequest::post_empty(format!("/cases/{}/open/", case.id.0));
        let response = self.session.send_authorized(request).await?;
        if !response.is_success() {
            return Err(protocol::rejection(&response).into());
        }

        let outcome: OpenResult = protocol::decode(&response)?;
        if !outcome.success {
            // A 2xx envelope can still carry a domain "no": surface its
            // message the same way as an HTTP rejection.
            return Err(ProtocolError::Rejected {
                status: response.status,
                message: outcome.message,
            }
            .into());
        }
        let Some(reward) = outcome.reward.clone() else {
            return Err(ProtocolError::Rejected {
                status: response.status,
                message: "open succeeded but carried no reward".to_string(),
            }
            .into());
        };

        let sequence =
            RevealSequence::build(&case.vegetables, &reward, &self.config, &mut rand::rng());
        tracing::info!(
            case = %case.id,
            reward = %reward.id,
            new_balance = ?outcome.new_balance,
            "open confirmed, starting reveal"
        );

        Ok(PendingReveal { outcome, sequence })
    }

    /// Phase 2: the clock-gated commit.
    ///
    /// Nothing visible changes until the spin has run its course; then the
    /// server-confirmed balance is applied and the result presented. The
    /// outcome itself was fixed in phase 1 and cannot fail here.
    async fn settle(&self, pending: PendingReveal) -> SettledOpen {
        self.clock.sleep(self.config.spin_duration).await;

        if let Some(new_balance) = pending.outcome.new_balance {
            self.session.apply_balance(new_balance);
        }
        self.present(pending.outcome.clone());
        tracing::debug!("open settled");

        SettledOpen {
            result: pending.outcome,
            sequence: pending.sequence,
        }
    }

    /// Puts the result up and arms its auto-dismiss timer.
    fn present(&self, result: OpenResult) {
        let generation = self.panel.present(result);

        let panel = Arc::clone(&self.panel);
        let clock = self.clock.clone();
        let dismiss_after = self.config.dismiss_after;
        tokio::spawn(async move {
            clock.sleep(dismiss_after).await;
            if panel.expire(generation) {
                tracing::debug!("result panel auto-dismissed");
            }
        });
    }
}
