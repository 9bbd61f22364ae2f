//! Wiring of storage, sessions and tracers for a host process
//!
//! [`Profiler`] builds the shared components from a [`ProfilerConfig`] and hands out tracers
//! that all feed the same [`TraceStorage`] and [`SessionManager`].

use crate::config::ProfilerConfig;
use crate::session::{SessionLifecycle, SessionManager, SessionReader, SessionRecord};
use crate::tracer::{HttpTracer, TraceEntry, TraceOptions, TraceStorage};
use std::sync::Arc;

/// Everything a debugging UI needs to render the profiler panel
#[derive(Debug, Clone, Default)]
pub struct ProfileSnapshot {
    /// Calls recorded in memory for the current scope
    pub requests: Vec<TraceEntry>,
    /// Persisted sessions, most recent first
    pub sessions: Vec<SessionRecord>,
}

pub struct Profiler {
    config: ProfilerConfig,
    storage: Arc<TraceStorage>,
    sessions: Arc<SessionManager>,
    reader: SessionReader,
}

impl Profiler {
    pub fn new(config: ProfilerConfig) -> Self {
        let storage = Arc::new(TraceStorage::default());
        let sessions = Arc::new(
            SessionManager::new(config.storage_directory.clone())
                .with_persistence(config.persist_sessions),
        );
        let reader = SessionReader::new(config.storage_directory.clone());

        Self {
            config,
            storage,
            sessions,
            reader,
        }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<TraceStorage> {
        &self.storage
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn reader(&self) -> &SessionReader {
        &self.reader
    }

    /// Wrap a client so its calls are recorded with the configured options
    pub fn trace<C>(&self, client: C) -> HttpTracer<C> {
        HttpTracer::new(
            client,
            Arc::clone(&self.storage),
            Arc::clone(&self.sessions),
            TraceOptions::from(&self.config),
        )
    }

    /// Session start/end hooks bound to this profiler's session manager
    pub fn lifecycle(&self) -> SessionLifecycle {
        SessionLifecycle::new(Arc::clone(&self.sessions), self.config.enabled)
    }

    pub fn collect(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            requests: self.storage.all(),
            sessions: self.reader.list_sessions(),
        }
    }

    /// Forget the in-memory calls, e.g. between two web requests
    pub fn reset(&self) {
        self.storage.clear();
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new(ProfilerConfig::default())
    }
}
