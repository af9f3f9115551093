//! Durable storage for the session record.
//!
//! The client survives process restarts without re-prompting for a
//! password: the token pair and cached profile are written to a small JSON
//! file and loaded back on startup. The [`SessionStore`] trait keeps the
//! manager testable (and lets embedders swap in their own keychain-backed
//! storage); [`FileSessionStore`] is the default implementation.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::Session;

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Durable storage for at most one [`Session`].
///
/// Implementations must be tolerant readers: a missing or unreadable record
/// is reported as `Ok(None)`, not an error, because the correct recovery in
/// every such case is simply "start anonymous".
pub trait SessionStore: Send + Sync + 'static {
    /// Loads the persisted session, if one exists and is readable.
    fn load(&self) -> io::Result<Option<Session>>;

    /// Persists the session, replacing any previous record.
    fn save(&self, session: &Session) -> io::Result<()>;

    /// Removes the persisted record. Idempotent.
    fn clear(&self) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

/// File-backed store: one JSON document at a fixed path.
///
/// The default location is `<platform data dir>/cropcase/session.json`
/// (e.g. `~/.local/share/cropcase/session.json` on Linux).
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the platform default location.
    ///
    /// # Errors
    /// Fails only when the platform reports no data directory at all
    /// (stripped-down containers, unusual sandboxes).
    pub fn at_default_location() -> io::Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "no platform data directory available",
            )
        })?;
        Ok(Self::new(base.join("cropcase").join("session.json")))
    }

    /// The file path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> io::Result<Option<Session>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        match serde_json::from_slice(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // A corrupt record is unrecoverable; treat it as absent so
                // the user lands on the login screen instead of a crash.
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "corrupt session record, starting anonymous"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(session)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, bytes)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// An in-memory store for tests and ephemeral embedders.
///
/// Clones share the same slot, which lets a test hand "the same disk" to
/// two manager instances and exercise the restore path.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> io::Result<Option<Session>> {
        Ok(self.slot.lock().expect("store lock poisoned").clone())
    }

    fn save(&self, session: &Session) -> io::Result<()> {
        *self.slot.lock().expect("store lock poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
