//! The profiling session state machine
//!
//! A [`SessionManager`] is either idle or holds exactly one active session. Entries added
//! while a session is active are written to `session-<id>.json` when the session ends.

use super::storage::{ensure_directory, resolve_storage_directory, session_file_path};
use crate::error::{ProfilerError, Result};
use crate::tracer::TraceEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};
use uuid::Uuid;

/// Persisted form of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub session_id: String,
    pub context: String,
    pub command: Option<String>,
    #[serde(with = "crate::timestamp")]
    pub started_at: DateTime<Utc>,
    pub entries: Vec<TraceEntry>,
}

#[derive(Debug)]
enum SessionState {
    Idle,
    Active(SessionDocument),
}

/// Owns the current profiling session
///
/// All methods take `&self`; the state is guarded internally so one manager can be shared
/// by every tracer of a process through an `Arc`.
pub struct SessionManager {
    state: Mutex<SessionState>,
    storage_directory: Option<PathBuf>,
    persist: bool,
}

impl SessionManager {
    /// Create an idle manager
    ///
    /// # Arguments
    ///
    /// * `storage_directory` - Where artifacts are written. `None` means
    ///   `<current dir>/var/http-profiler`, resolved when a session ends.
    pub fn new(storage_directory: Option<PathBuf>) -> Self {
        Self {
            state: Mutex::new(SessionState::Idle),
            storage_directory,
            persist: true,
        }
    }

    /// Choose whether ended sessions are written to disk (default: true)
    pub fn with_persistence(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Directory artifacts are currently written to
    pub fn storage_directory(&self) -> PathBuf {
        resolve_storage_directory(self.storage_directory.as_deref())
    }

    pub fn persists_sessions(&self) -> bool {
        self.persist
    }

    /// Open a new session
    ///
    /// # Arguments
    ///
    /// * `context` - Classification of the execution, e.g. `cli`, `web` or `worker`
    /// * `command` - Optional label such as the CLI command name
    ///
    /// # Errors
    ///
    /// [`ProfilerError::SessionAlreadyActive`] when a session is already open; the open
    /// session is left untouched.
    pub fn start_session(&self, context: impl Into<String>, command: Option<&str>) -> Result<()> {
        let mut state = self.state();

        if let SessionState::Active(active) = &*state {
            return Err(ProfilerError::SessionAlreadyActive(active.session_id.clone()));
        }

        let session = SessionDocument {
            session_id: Uuid::new_v4().simple().to_string(),
            context: context.into(),
            command: command.map(str::to_string),
            started_at: Utc::now(),
            entries: Vec::new(),
        };

        info!(
            session_id = %session.session_id,
            context = %session.context,
            command = ?session.command,
            "Profiling session started"
        );

        *state = SessionState::Active(session);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        matches!(*self.state(), SessionState::Active(_))
    }

    /// Id of the active session
    pub fn get_session_id(&self) -> Result<String> {
        match &*self.state() {
            SessionState::Active(session) => Ok(session.session_id.clone()),
            SessionState::Idle => Err(ProfilerError::NoActiveSession),
        }
    }

    /// Number of entries recorded in the active session, zero when idle
    pub fn trace_count(&self) -> usize {
        match &*self.state() {
            SessionState::Active(session) => session.entries.len(),
            SessionState::Idle => 0,
        }
    }

    /// Append an entry to the active session; does nothing when idle
    pub fn add_trace(&self, entry: TraceEntry) {
        if let SessionState::Active(session) = &mut *self.state() {
            session.entries.push(entry);
        }
    }

    /// Close the active session and write its artifact
    ///
    /// Returns the path of the written file, or `None` when no session was active or
    /// persistence is disabled. The manager is idle afterwards even when writing fails;
    /// the failure is still returned.
    pub fn end_session(&self) -> Result<Option<PathBuf>> {
        let session = match std::mem::replace(&mut *self.state(), SessionState::Idle) {
            SessionState::Idle => return Ok(None),
            SessionState::Active(session) => session,
        };

        if !self.persist {
            debug!(session_id = %session.session_id, "Session persistence disabled, discarding");
            return Ok(None);
        }

        let path = write_session(&self.storage_directory(), &session)?;

        info!(
            session_id = %session.session_id,
            entries = session.entries.len(),
            path = %path.display(),
            "Profiling session persisted"
        );

        Ok(Some(path))
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(None)
    }
}

fn write_session(directory: &Path, session: &SessionDocument) -> Result<PathBuf> {
    ensure_directory(directory)?;

    let json = serde_json::to_string_pretty(session).map_err(|source| ProfilerError::Encoding {
        session_id: session.session_id.clone(),
        source,
    })?;

    let path = session_file_path(directory, &session.session_id);
    let temp_path = directory.join(format!(".session-{}.json.tmp", session.session_id));

    // Write to temp file first, then rename atomically
    if let Err(source) = fs::write(&temp_path, json) {
        let _ = fs::remove_file(&temp_path);
        return Err(ProfilerError::Write {
            path: temp_path,
            source,
        });
    }

    if let Err(source) = fs::rename(&temp_path, &path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ProfilerError::Write { path, source });
    }

    Ok(path)
}
