//! Clock abstraction for Cropcase's time-gated flows.
//!
//! The case-opening orchestrator commits state only after a fixed reveal
//! duration, and the result panel dismisses itself after a fixed timeout.
//! Both are *wall-clock* behaviors in production and *logical-time*
//! behaviors in tests — so the duration waits go through the [`Clock`]
//! trait instead of calling `tokio::time::sleep` directly.
//!
//! Two implementations are provided:
//!
//! - [`TokioClock`] — the real thing. Delegates to `tokio::time::sleep`,
//!   which also means `#[tokio::test(start_paused = true)]` tests get
//!   auto-advancing virtual time for free.
//! - [`ManualClock`] — a fake that only moves when the test calls
//!   [`advance`](ManualClock::advance). Useful when a test needs to assert
//!   what the world looks like *between* two instants.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// A source of "wait this long" for time-gated flows.
///
/// # Trait bounds
///
/// - `Clone + Send + Sync + 'static` — clocks are handed to spawned tasks
///   (the panel's auto-dismiss timer), so they must be cheaply shareable.
/// - The returned future is `Send + 'static`: it must own what it needs
///   rather than borrow the clock, so callers can spawn it directly.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Resolves after `duration` of this clock's time has passed.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send + 'static;
}

// ---------------------------------------------------------------------------
// TokioClock
// ---------------------------------------------------------------------------

/// The production clock: tokio's timer wheel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send + 'static {
        tokio::time::sleep(duration)
    }
}

// ---------------------------------------------------------------------------
// ManualClock
// ---------------------------------------------------------------------------

/// A test clock that only moves when told to.
///
/// Sleepers register a deadline on [`sleep`](Clock::sleep) and are woken by
/// [`advance`]. Registration happens when `sleep` is *called* (not when the
/// future is first polled), so a test can call `sleep`, assert
/// [`waiting`](Self::waiting), and then advance — no polling races.
///
/// [`advance`]: Self::advance
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualInner>>,
}

#[derive(Debug, Default)]
struct ManualInner {
    now: Duration,
    sleepers: Vec<Sleeper>,
}

#[derive(Debug)]
struct Sleeper {
    deadline: Duration,
    waker: oneshot::Sender<()>,
}

impl ManualClock {
    /// Creates a clock at time zero with no sleepers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward, waking every sleeper whose deadline has
    /// been reached (inclusive).
    pub fn advance(&self, by: Duration) {
        let woken = {
            let mut inner = self.inner.lock().expect("clock lock poisoned");
            inner.now += by;
            let now = inner.now;
            let (due, pending): (Vec<_>, Vec<_>) = inner
                .sleepers
                .drain(..)
                .partition(|s| s.deadline <= now);
            inner.sleepers = pending;
            due
        };
        for sleeper in woken {
            // The receiver may be gone if the sleeping task was dropped.
            let _ = sleeper.waker.send(());
        }
    }

    /// Returns the current logical time.
    pub fn now(&self) -> Duration {
        self.inner.lock().expect("clock lock poisoned").now
    }

    /// Returns how many sleepers are waiting for a future deadline.
    pub fn waiting(&self) -> usize {
        self.inner.lock().expect("clock lock poisoned").sleepers.len()
    }
}

impl Clock for ManualClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        {
            let mut inner = self.inner.lock().expect("clock lock poisoned");
            if duration.is_zero() {
                let _ = tx.send(());
            } else {
                let deadline = inner.now + duration;
                inner.sleepers.push(Sleeper {
                    deadline,
                    waker: tx,
                });
            }
        }
        async move {
            // A dropped sender means the clock itself was dropped; resolving
            // is the least surprising behavior for a test teardown.
            let _ = rx.await;
        }
    }
}
