//! Location and naming of persisted session artifacts
//!
//! [`SessionManager`](super::SessionManager) and [`SessionReader`](super::SessionReader) both
//! go through these functions so that written sessions are always visible to the reader.

use crate::error::{ProfilerError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Subpath of the working directory used when no directory is configured
pub const DEFAULT_STORAGE_SUBPATH: &str = "var/http-profiler";

/// Glob matching every session artifact inside the storage directory
pub const SESSION_FILE_GLOB: &str = "session-*.json";

fn session_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^session-(.+)\.json$").expect("valid session file pattern"))
}

/// The configured directory, or `<current dir>/var/http-profiler`
pub fn resolve_storage_directory(configured: Option<&Path>) -> PathBuf {
    match configured {
        Some(directory) => directory.to_path_buf(),
        None => std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_STORAGE_SUBPATH),
    }
}

pub fn session_file_name(session_id: &str) -> String {
    format!("session-{}.json", session_id)
}

pub fn session_file_path(directory: &Path, session_id: &str) -> PathBuf {
    directory.join(session_file_name(session_id))
}

/// Extract `<id>` from a file named exactly `session-<id>.json`
pub fn session_id_from_file_name(file_name: &str) -> Option<String> {
    session_file_pattern().captures(file_name).map(|caps| caps[1].to_string())
}

/// Whether an id can be turned into a file name without leaving the storage directory
pub fn is_valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id != "."
        && session_id != ".."
        && !session_id.contains(['/', '\\'])
}

/// Create `directory` if it is missing
///
/// Another process may create it concurrently; that is not an error as long as the
/// directory exists once creation has been attempted.
pub fn ensure_directory(directory: &Path) -> Result<()> {
    if directory.is_dir() {
        return Ok(());
    }

    match fs::create_dir_all(directory) {
        Ok(()) => Ok(()),
        Err(_) if directory.is_dir() => Ok(()),
        Err(source) => Err(ProfilerError::CreateDirectory {
            path: directory.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_configured_directory_wins() {
        let configured = PathBuf::from("/srv/profiles");
        assert_eq!(resolve_storage_directory(Some(&configured)), configured);
    }

    #[test]
    fn test_default_directory_is_under_working_directory() {
        let resolved = resolve_storage_directory(None);
        assert!(resolved.ends_with("var/http-profiler"));
    }

    #[test]
    fn test_session_file_naming() {
        assert_eq!(session_file_name("abc"), "session-abc.json");
        assert_eq!(
            session_file_path(Path::new("/data"), "abc"),
            PathBuf::from("/data/session-abc.json")
        );
    }

    #[test]
    fn test_session_id_from_file_name() {
        assert_eq!(session_id_from_file_name("session-abc123.json"), Some("abc123".to_string()));
        assert_eq!(session_id_from_file_name("session-.json"), None);
        assert_eq!(session_id_from_file_name("session-abc.json.tmp"), None);
        assert_eq!(session_id_from_file_name("other-abc.json"), None);
    }

    #[test]
    fn test_session_id_validation() {
        assert!(is_valid_session_id("0f3a9c"));
        assert!(!is_valid_session_id(""));
        assert!(!is_valid_session_id("../secrets"));
        assert!(!is_valid_session_id("a/b"));
        assert!(!is_valid_session_id("a\\b"));
        assert!(!is_valid_session_id(".."));
        assert!(!is_valid_session_id("."));
    }

    #[test]
    fn test_dots_inside_session_id_are_allowed() {
        assert!(is_valid_session_id("a..b"));
        assert!(is_valid_session_id("v1.2"));
    }

    #[test]
    fn test_ensure_directory_creates_nested() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("var").join("http-profiler");

        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());

        // existing directory is fine
        ensure_directory(&nested).unwrap();
    }

    #[test]
    fn test_ensure_directory_fails_on_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let result = ensure_directory(&blocker.join("sessions"));

        assert!(matches!(result, Err(ProfilerError::CreateDirectory { .. })));
    }
}
