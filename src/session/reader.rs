//! Read access to persisted session artifacts

use super::storage::{
    is_valid_session_id, resolve_storage_directory, session_file_path,
    session_id_from_file_name, SESSION_FILE_GLOB,
};
use crate::error::{ProfilerError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A decoded session artifact as a generic JSON object
pub type SessionRecord = Map<String, Value>;

/// Enumerates and loads the sessions written by [`SessionManager`](super::SessionManager)
#[derive(Debug, Clone, Default)]
pub struct SessionReader {
    storage_directory: Option<PathBuf>,
}

impl SessionReader {
    /// Create a reader over the same directory convention as the session manager
    pub fn new(storage_directory: Option<PathBuf>) -> Self {
        Self { storage_directory }
    }

    pub fn storage_directory(&self) -> PathBuf {
        resolve_storage_directory(self.storage_directory.as_deref())
    }

    /// All readable sessions, most recently started first
    ///
    /// A missing directory yields an empty list. Artifacts that cannot be loaded are
    /// skipped so that one corrupt file never hides the others.
    pub fn list_sessions(&self) -> Vec<SessionRecord> {
        let directory = self.storage_directory();

        if !directory.is_dir() {
            return Vec::new();
        }

        let escaped = glob::Pattern::escape(&directory.to_string_lossy());
        let pattern = PathBuf::from(escaped).join(SESSION_FILE_GLOB);

        let paths = match glob::glob(&pattern.to_string_lossy()) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Invalid session glob pattern: {}", e);
                return Vec::new();
            }
        };

        let mut sessions: Vec<SessionRecord> = paths
            .filter_map(|entry| entry.ok())
            .filter_map(|path| {
                let file_name = path.file_name()?.to_str()?;
                session_id_from_file_name(file_name)
            })
            .filter_map(|session_id| match self.load_session(&session_id) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(session_id = %session_id, "Skipping unreadable session: {}", e);
                    None
                }
            })
            .collect();

        sessions.sort_by(|first, second| started_at(second).cmp(started_at(first)));

        debug!("Listed {} sessions from {}", sessions.len(), directory.display());
        sessions
    }

    /// Load one session by id
    ///
    /// # Errors
    ///
    /// - [`ProfilerError::SessionNotFound`] when no artifact exists for the id
    /// - [`ProfilerError::Read`] when the file cannot be read
    /// - [`ProfilerError::InvalidJson`] when the file is not valid JSON
    /// - [`ProfilerError::MalformedSession`] when the JSON is not an object
    pub fn load_session(&self, session_id: &str) -> Result<SessionRecord> {
        let path = session_file_path(&self.storage_directory(), session_id);

        if !is_valid_session_id(session_id) || !path.is_file() {
            return Err(ProfilerError::SessionNotFound(path));
        }

        let payload = fs::read_to_string(&path).map_err(|source| ProfilerError::Read {
            path: path.clone(),
            source,
        })?;

        let data: Value = serde_json::from_str(&payload).map_err(|source| {
            ProfilerError::InvalidJson {
                path: path.clone(),
                source,
            }
        })?;

        match data {
            Value::Object(session) => Ok(session),
            _ => Err(ProfilerError::MalformedSession(path)),
        }
    }
}

fn started_at(session: &SessionRecord) -> &str {
    session.get("started_at").and_then(Value::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Headers;
    use crate::session::SessionManager;
    use crate::tracer::TraceEntry;
    use chrono::Utc;
    use serde_json::json;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_session(directory: &Path, session_id: &str, started_at: &str) {
        fs::create_dir_all(directory).unwrap();
        let document = json!({
            "session_id": session_id,
            "context": "cli",
            "command": null,
            "started_at": started_at,
            "entries": []
        });
        fs::write(
            directory.join(format!("session-{}.json", session_id)),
            serde_json::to_string_pretty(&document).unwrap(),
        )
        .unwrap();
    }

    fn ids(sessions: &[SessionRecord]) -> Vec<&str> {
        sessions.iter().map(|s| s["session_id"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let temp = TempDir::new().unwrap();
        let reader = SessionReader::new(Some(temp.path().join("does-not-exist")));

        assert!(reader.list_sessions().is_empty());
    }

    #[test]
    fn test_empty_directory_lists_nothing() {
        let temp = TempDir::new().unwrap();
        let reader = SessionReader::new(Some(temp.path().to_path_buf()));

        assert!(reader.list_sessions().is_empty());
    }

    #[test]
    fn test_sessions_sorted_newest_first() {
        let temp = TempDir::new().unwrap();
        write_session(temp.path(), "t2", "2024-01-02T00:00:00.000000+00:00");
        write_session(temp.path(), "t1", "2024-01-01T00:00:00.000000+00:00");
        write_session(temp.path(), "t3", "2024-01-03T00:00:00.000000+00:00");

        let reader = SessionReader::new(Some(temp.path().to_path_buf()));
        let sessions = reader.list_sessions();

        assert_eq!(ids(&sessions), vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        write_session(temp.path(), "valid", "2024-01-01T00:00:00.000000+00:00");
        fs::write(temp.path().join("session-broken.json"), "{ not json").unwrap();

        let reader = SessionReader::new(Some(temp.path().to_path_buf()));
        let sessions = reader.list_sessions();

        assert_eq!(ids(&sessions), vec!["valid"]);
    }

    #[test]
    fn test_non_object_and_foreign_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        write_session(temp.path(), "valid", "2024-01-01T00:00:00.000000+00:00");
        fs::write(temp.path().join("session-list.json"), "[1, 2, 3]").unwrap();
        fs::write(temp.path().join("notes.json"), "{}").unwrap();
        fs::write(temp.path().join("session-.json"), "{}").unwrap();

        let reader = SessionReader::new(Some(temp.path().to_path_buf()));

        assert_eq!(ids(&reader.list_sessions()), vec!["valid"]);
    }

    #[test]
    fn test_ids_with_inner_dots_are_listed() {
        let temp = TempDir::new().unwrap();
        write_session(temp.path(), "a..b", "2024-01-01T00:00:00.000000+00:00");

        let reader = SessionReader::new(Some(temp.path().to_path_buf()));

        assert_eq!(ids(&reader.list_sessions()), vec!["a..b"]);
        assert!(reader.load_session("a..b").is_ok());
        assert!(matches!(
            reader.load_session("..").unwrap_err(),
            ProfilerError::SessionNotFound(_)
        ));
    }

    #[test]
    fn test_load_missing_session() {
        let temp = TempDir::new().unwrap();
        let reader = SessionReader::new(Some(temp.path().to_path_buf()));

        let err = reader.load_session("nope").unwrap_err();
        assert!(matches!(err, ProfilerError::SessionNotFound(_)));
    }

    #[test]
    fn test_load_rejects_path_traversal() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("sessions");
        write_session(temp.path(), "outside", "2024-01-01T00:00:00.000000+00:00");
        fs::create_dir_all(&nested).unwrap();

        let reader = SessionReader::new(Some(nested));

        let err = reader.load_session("../session-outside").unwrap_err();
        assert!(matches!(err, ProfilerError::SessionNotFound(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("session-bad.json"), "{ nope").unwrap();
        let reader = SessionReader::new(Some(temp.path().to_path_buf()));

        let err = reader.load_session("bad").unwrap_err();
        assert!(matches!(err, ProfilerError::InvalidJson { .. }));
    }

    #[test]
    fn test_load_non_object() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("session-str.json"), r#""just a string""#).unwrap();
        let reader = SessionReader::new(Some(temp.path().to_path_buf()));

        let err = reader.load_session("str").unwrap_err();
        assert!(matches!(err, ProfilerError::MalformedSession(_)));
    }

    #[test]
    fn test_round_trip_with_session_manager() {
        let temp = TempDir::new().unwrap();
        let directory = temp.path().join("profiles");
        let manager = SessionManager::new(Some(directory.clone()));
        let reader = SessionReader::new(Some(directory));

        let mut request_headers = Headers::new();
        request_headers.insert("Authorization".to_string(), vec!["***".to_string()]);
        let entry = TraceEntry {
            timestamp: Utc::now(),
            method: "POST".to_string(),
            url: "https://example.com/login".to_string(),
            request_headers,
            request_body: Some(r#"{"user":"ada"}"#.to_string()),
            response_status: None,
            response_headers: Headers::new(),
            response_body: None,
            duration_ms: Some(12.5),
            error: Some("connection refused".to_string()),
            stack_trace: vec!["src/login.rs:10 login".to_string()],
        };

        manager.start_session("cli", Some("app:login")).unwrap();
        let id = manager.get_session_id().unwrap();
        manager.add_trace(entry.clone());
        let path = manager.end_session().unwrap().unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        let loaded = reader.load_session(&id).unwrap();

        assert_eq!(Value::Object(loaded.clone()), written);

        let entries = loaded["entries"].as_array().unwrap();
        let restored: TraceEntry = serde_json::from_value(entries[0].clone()).unwrap();
        assert_eq!(restored.url, entry.url);
        assert_eq!(restored.error, entry.error);
        assert_eq!(restored.request_headers, entry.request_headers);

        assert_eq!(ids(&reader.list_sessions()), vec![id.as_str()]);
    }
}
