//! Reveal configuration and the opening-flow state machine.

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// RevealConfig
// ---------------------------------------------------------------------------

/// Configuration for the reveal animation and result presentation.
///
/// The defaults reproduce the storefront's tuned feel: a 51-slot strip
/// that stops on the 31st slot after a 3-second spin, with the result
/// panel lingering for 5 seconds.
#[derive(Debug, Clone)]
pub struct RevealConfig {
    /// Total slots in the reveal strip, decoys plus the reward slot.
    pub sequence_len: usize,

    /// Zero-based index where the authoritative reward sits. Default 30,
    /// i.e. the 31st slot; the slots after it exist so the strip doesn't
    /// visibly end at the marker.
    pub reveal_slot: usize,

    /// How long the spin runs before the result is committed.
    pub spin_duration: Duration,

    /// How long the result panel stays up before dismissing itself.
    pub dismiss_after: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            sequence_len: 51,
            reveal_slot: 30,
            spin_duration: Duration::from_secs(3),
            dismiss_after: Duration::from_secs(5),
        }
    }
}

impl RevealConfig {
    /// Clamp any out-of-range values so the config is safe to use.
    ///
    /// Called by [`CaseOpener::new`](crate::CaseOpener::new). Rules:
    /// - `sequence_len` is at least 1 (a strip needs a reward slot).
    /// - `reveal_slot` is brought inside the strip.
    pub fn validated(mut self) -> Self {
        if self.sequence_len == 0 {
            tracing::warn!("sequence_len of 0 is unusable, clamping to 1");
            self.sequence_len = 1;
        }
        if self.reveal_slot >= self.sequence_len {
            tracing::warn!(
                slot = self.reveal_slot,
                len = self.sequence_len,
                "reveal_slot outside the strip, clamping"
            );
            self.reveal_slot = self.sequence_len - 1;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// OpeningPhase
// ---------------------------------------------------------------------------

/// Where the opener currently is in the open-case flow.
///
/// ```text
/// Idle ──(open)──→ Requesting ──(server confirmed)──→ Revealing ──→ Idle
///   ↑                   │                                  │
///   └──(rejected/error)─┴──────────────(settled)───────────┘
/// ```
///
/// - **Idle**: no open in flight; the trigger control is enabled.
/// - **Requesting**: advisory checks passed, the authoritative request is
///   in flight. The UI shows its busy state.
/// - **Revealing**: the server answered, the spin is running. Input stays
///   blocked; the committed result is already known internally.
///
/// Any phase other than `Idle` means "busy": a second open attempt fails
/// fast instead of queueing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningPhase {
    Idle,
    Requesting,
    Revealing,
}

impl OpeningPhase {
    /// Returns `true` if an open is in flight (the UI's `opening` flag).
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for OpeningPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Requesting => write!(f, "Requesting"),
            Self::Revealing => write!(f, "Revealing"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
