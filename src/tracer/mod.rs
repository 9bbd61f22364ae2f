//! HTTP call tracing
//!
//! The tracer wraps HTTP clients and records every call they make, without changing what
//! the caller gets back.
//!
//! # Architecture
//!
//! - **TraceEntry**: Immutable record of one call (request, response or error, timing, call site)
//! - **TraceStorage**: Shared append-only in-memory store of entries with an optional callback
//! - **HttpTracer**: Decorator for [`HttpClient`](crate::http::HttpClient) and
//!   [`BlockingHttpClient`](crate::http::BlockingHttpClient) implementations
//! - **sanitize**: Header masking and body truncation applied before entries are stored
//! - **stack_trace**: Best-effort call-site capture
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use http_profiler::http::{HttpClient, HttpRequest, ReqwestClient};
//! use http_profiler::session::SessionManager;
//! use http_profiler::tracer::{HttpTracer, TraceOptions, TraceStorage};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(TraceStorage::default());
//! let sessions = Arc::new(SessionManager::default());
//! let client = HttpTracer::new(
//!     ReqwestClient::new(),
//!     Arc::clone(&storage),
//!     sessions,
//!     TraceOptions::default(),
//! );
//!
//! let response = client.send(HttpRequest::get("https://example.com")).await?;
//!
//! for entry in storage.all() {
//!     println!("{}", entry.printable_summary());
//! }
//! ```
//!
//! # Masking
//!
//! Values of `Authorization`, `Cookie`, `Proxy-Authorization`, `Proxy-Authenticate`,
//! `Set-Cookie`, `Token` and `WWW-Authenticate` are replaced with `***` in recorded entries.
//! Truncated bodies carry no marker, so a short body and a cut one look the same.
//!
//! # Cancellation
//!
//! Dropping a traced future before it settles (a timeout, a losing `select!` branch)
//! records the call as failed with the error `request cancelled`.

pub mod http_tracer;
pub mod sanitize;
pub mod stack_trace;
pub mod trace_entry;
pub mod trace_storage;

pub use http_tracer::{HttpTracer, TraceOptions, CANCELLED_ERROR};
pub use sanitize::{REDACTION_MARKER, SENSITIVE_HEADERS};
pub use trace_entry::TraceEntry;
pub use trace_storage::{TraceCallback, TraceStorage};
