//! Error types and result aliases for the profiler.
//!
//! This module defines the core error type [`ProfilerError`] and the [`Result`] type alias
//! used by the session and configuration APIs. Failures of the wrapped HTTP clients are
//! never converted into [`ProfilerError`]: tracers hand back the client's own error type.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfilerError {
    #[error("A profiling session is already active: {0}")]
    SessionAlreadyActive(String),

    #[error("No active profiling session")]
    NoActiveSession,

    #[error("Unable to create session directory {path:?}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to encode session {session_id}: {source}")]
    Encoding {
        session_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to write session file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file {0:?} does not exist")]
    SessionNotFound(PathBuf),

    #[error("Unable to read session file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in session file {path:?}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session file {0:?} did not contain a JSON object")]
    MalformedSession(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl ProfilerError {
    /// Errors caused by calling the session API in the wrong state.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::SessionAlreadyActive(_) | Self::NoActiveSession)
    }

    /// Errors raised while writing or reading session artifacts.
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            Self::CreateDirectory { .. }
                | Self::Encoding { .. }
                | Self::Write { .. }
                | Self::SessionNotFound(_)
                | Self::Read { .. }
                | Self::InvalidJson { .. }
                | Self::MalformedSession(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ProfilerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_already_active_display() {
        let err = ProfilerError::SessionAlreadyActive("abc123".to_string());
        assert_eq!(err.to_string(), "A profiling session is already active: abc123");
    }

    #[test]
    fn test_no_active_session_display() {
        let err = ProfilerError::NoActiveSession;
        assert_eq!(err.to_string(), "No active profiling session");
    }

    #[test]
    fn test_config_error_display() {
        let err = ProfilerError::ConfigError("bad max body length".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: bad max body length");
    }

    #[test]
    fn test_not_found_mentions_path() {
        let err = ProfilerError::SessionNotFound(PathBuf::from("/tmp/session-x.json"));
        assert!(err.to_string().contains("session-x.json"));
    }

    #[test]
    fn test_usage_error_classification() {
        assert!(ProfilerError::NoActiveSession.is_usage_error());
        assert!(ProfilerError::SessionAlreadyActive("id".into()).is_usage_error());
        assert!(!ProfilerError::NoActiveSession.is_persistence_error());
    }

    #[test]
    fn test_persistence_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ProfilerError::Write {
            path: PathBuf::from("/readonly/session-x.json"),
            source: io_err,
        };

        assert!(err.is_persistence_error());
        assert!(!err.is_usage_error());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_invalid_json_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ProfilerError::InvalidJson {
            path: PathBuf::from("session-x.json"),
            source: json_err,
        };

        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_debug() {
        let err = ProfilerError::MalformedSession(PathBuf::from("session-x.json"));
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("MalformedSession"));
    }
}
