//! Profiling sessions
//!
//! A session groups the HTTP calls of one execution (a CLI command, a web request, a
//! worker run) and is persisted as `session-<id>.json` when it ends.
//!
//! - **SessionManager**: single active session state machine and artifact writer
//! - **SessionReader**: lists and loads persisted artifacts
//! - **SessionLifecycle**: start/end hooks for the host, with a scope guard
//! - **ContextDetector**: classifies the process as `cli`, `web` or `worker`
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use http_profiler::session::{SessionManager, SessionReader};
//!
//! let manager = SessionManager::new(Some("/tmp/profiles".into()));
//! manager.start_session("cli", Some("app:import"))?;
//! // ... traced HTTP calls ...
//! manager.end_session()?;
//!
//! let reader = SessionReader::new(Some("/tmp/profiles".into()));
//! for session in reader.list_sessions() {
//!     println!("{} {}", session["session_id"], session["started_at"]);
//! }
//! ```

pub mod context;
pub mod lifecycle;
pub mod manager;
pub mod reader;
pub mod storage;

pub use context::{ContextDetector, ExecutionContext};
pub use lifecycle::{SessionLifecycle, SessionScope};
pub use manager::{SessionDocument, SessionManager};
pub use reader::{SessionReader, SessionRecord};
pub use storage::resolve_storage_directory;
