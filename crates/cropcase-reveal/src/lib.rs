//! Case-opening orchestration for Cropcase.
//!
//! Opening a case is the one flow in the client with real state-machine
//! behavior: a user intent becomes a single authoritative backend
//! transaction, wrapped in a decorative reveal animation, and the visible
//! state (balance, result panel) settles only after both have finished.
//!
//! # Key types
//!
//! - [`CaseOpener`] — runs the open protocol: busy guard, advisory
//!   preconditions, the authoritative request, and the clock-gated
//!   settlement
//! - [`RevealSequence`] — the decorative strip of decoys with the real
//!   reward at a fixed slot
//! - [`ResultPanel`] — the auto-dismissing result presentation
//! - [`OpeningPhase`] — where in the flow the opener currently is
//! - [`RevealConfig`] — slot counts and durations
//!
//! # Two-phase settlement
//!
//! The server's answer is recorded the moment it arrives (phase 1), but
//! nothing visible changes until the spin duration has elapsed on the
//! injected [`Clock`](cropcase_timer::Clock) (phase 2). Tests drive the
//! clock by hand and observe the gap between the phases; production uses
//! the tokio clock and never notices there were two.

mod config;
mod error;
mod orchestrator;
mod panel;
mod sequence;

pub use config::{OpeningPhase, RevealConfig};
pub use error::OpenError;
pub use orchestrator::{CaseOpener, SettledOpen};
pub use panel::ResultPanel;
pub use sequence::RevealSequence;
