//! The result panel: at most one presented open result at a time.

use std::sync::Mutex;

use cropcase_protocol::OpenResult;

/// Holds the result the UI is currently showing, if any.
///
/// A presentation can end two ways, whichever comes first: the user
/// dismisses it, or the auto-dismiss timer fires. The timer path carries a
/// *generation* so that a timer armed for an old result can never clear a
/// newer one — without it, open → dismiss → open again inside the timeout
/// would make the first timer eat the second result.
#[derive(Debug, Default)]
pub struct ResultPanel {
    inner: Mutex<PanelInner>,
}

#[derive(Debug, Default)]
struct PanelInner {
    current: Option<OpenResult>,
    generation: u64,
}

impl ResultPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently presented result, if any.
    pub fn current(&self) -> Option<OpenResult> {
        self.inner.lock().expect("panel lock poisoned").current.clone()
    }

    /// Whether anything is on screen.
    pub fn is_visible(&self) -> bool {
        self.inner.lock().expect("panel lock poisoned").current.is_some()
    }

    /// Explicit user dismissal. Idempotent.
    pub fn dismiss(&self) {
        self.inner.lock().expect("panel lock poisoned").current = None;
    }

    /// Presents a result, replacing whatever was up. Returns the
    /// generation to hand to [`expire`](Self::expire).
    pub(crate) fn present(&self, result: OpenResult) -> u64 {
        let mut inner = self.inner.lock().expect("panel lock poisoned");
        inner.generation += 1;
        inner.current = Some(result);
        inner.generation
    }

    /// Timer-path dismissal: clears the panel only if `generation` is
    /// still the one on screen. Returns whether anything was cleared.
    pub(crate) fn expire(&self, generation: u64) -> bool {
        let mut inner = self.inner.lock().expect("panel lock poisoned");
        if inner.generation == generation && inner.current.is_some() {
            inner.current = None;
            true
        } else {
            false
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
