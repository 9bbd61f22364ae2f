//! The record produced for every traced HTTP call
//!
//! A [`TraceEntry`] is built once the call has settled and is never modified afterwards.
//! It serializes to the same shape used inside persisted session artifacts.

use crate::http::Headers;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Records one HTTP call made through a traced client
///
/// A successful call carries a `response_status` and no `error`; a failed call carries an
/// `error` and no status, headers or body for the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// When the call was dispatched
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
    /// HTTP method, e.g. `GET`
    pub method: String,
    /// Full request target
    pub url: String,
    /// Request headers, masked when masking is enabled
    pub request_headers: Headers,
    /// Stringified and truncated request body
    pub request_body: Option<String>,
    /// Status code, absent when the call failed
    pub response_status: Option<u16>,
    /// Response headers, masked when masking is enabled
    pub response_headers: Headers,
    /// Truncated response body, absent on failure or for non-text bodies
    pub response_body: Option<String>,
    /// Elapsed time from dispatch to settlement in milliseconds
    pub duration_ms: Option<f64>,
    /// Failure message of the wrapped client
    pub error: Option<String>,
    /// Call-site frames formatted as `<file>:<line> <function>`
    pub stack_trace: Vec<String>,
}

impl TraceEntry {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.response_status.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Get a formatted string summary of the entry
    pub fn printable_summary(&self) -> String {
        let time_str = self.timestamp.with_timezone(&Local).format("%H:%M:%S%.3f").to_string();

        let mut summary = format!("[{}] {} {}", time_str, self.method, self.url);

        if let Some(status) = self.response_status {
            summary.push_str(&format!("\n   Status: {}", status));
        }

        if let Some(error) = &self.error {
            summary.push_str(&format!("\n   Error: {}", error));
        }

        if let Some(body) = &self.response_body {
            let body_preview = if body.chars().count() > 100 {
                format!("{}...", body.chars().take(100).collect::<String>())
            } else {
                body.clone()
            };
            summary.push_str(&format!("\n   Response: {}", body_preview));
        }

        if let Some(duration) = self.duration_ms {
            summary.push_str(&format!("\n   Duration: {:.2}ms", duration));
        }

        summary
    }
}
