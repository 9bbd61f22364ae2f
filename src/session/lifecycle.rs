//! Hooks the host calls at the boundaries of an execution
//!
//! A CLI command, web request or worker iteration starts a session when it begins and
//! ends it when it finishes. [`SessionScope`] ties the end to a value going out of scope.

use super::context::{ContextDetector, ExecutionContext};
use super::manager::SessionManager;
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Starts and ends sessions on behalf of the host environment
#[derive(Clone)]
pub struct SessionLifecycle {
    sessions: Arc<SessionManager>,
    detector: ContextDetector,
    enabled: bool,
}

impl SessionLifecycle {
    /// # Arguments
    ///
    /// * `sessions` - Manager shared with the tracers
    /// * `enabled` - When false, starting a context opens no session
    pub fn new(sessions: Arc<SessionManager>, enabled: bool) -> Self {
        Self {
            sessions,
            detector: ContextDetector::new(),
            enabled,
        }
    }

    pub fn with_detector(mut self, detector: ContextDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Called when an execution begins, e.g. before a CLI command runs
    pub fn on_context_start(&self, context: &str, label: Option<&str>) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.sessions.start_session(context, label)
    }

    /// Like [`on_context_start`](Self::on_context_start) with the context detected from the
    /// environment
    pub fn on_detected_context_start(&self, label: Option<&str>) -> Result<ExecutionContext> {
        let context = self.detector.detect();
        self.on_context_start(context.as_str(), label)?;
        Ok(context)
    }

    /// Called when an execution finishes; returns the written artifact, if any
    ///
    /// A disabled lifecycle never opened a session, so it leaves the manager alone.
    pub fn on_context_end(&self) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }
        self.sessions.end_session()
    }

    /// Start a session that ends when the returned scope is dropped or finished
    pub fn scope(&self, context: &str, label: Option<&str>) -> Result<SessionScope> {
        self.on_context_start(context, label)?;
        Ok(SessionScope {
            sessions: Arc::clone(&self.sessions),
            finished: !self.enabled,
        })
    }
}

/// Guard for a session opened by [`SessionLifecycle::scope`]
///
/// Dropping the guard ends the session and logs persistence failures. Call
/// [`finish`](Self::finish) to receive them instead.
#[must_use = "the session ends as soon as the scope is dropped"]
pub struct SessionScope {
    sessions: Arc<SessionManager>,
    finished: bool,
}

impl SessionScope {
    pub fn finish(mut self) -> Result<Option<PathBuf>> {
        if self.finished {
            return Ok(None);
        }
        self.finished = true;
        self.sessions.end_session()
    }
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.sessions.end_session() {
            warn!("Failed to persist profiling session: {}", e);
        }
    }
}
