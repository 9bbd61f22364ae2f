//! Transparent tracing decorator for HTTP clients
//!
//! [`HttpTracer`] wraps any [`HttpClient`] or [`BlockingHttpClient`]. Every call is
//! forwarded untouched; once it settles a [`TraceEntry`] is recorded in the shared
//! [`TraceStorage`] and, when a session is open, in the [`SessionManager`]. The caller
//! receives exactly the response or error the wrapped client produced.

use super::sanitize::{
    mask_sensitive_headers, stringify_request_body, stringify_response_body, truncate_body,
};
use super::stack_trace::{capture_stack_trace, failure_trace};
use super::trace_entry::TraceEntry;
use super::trace_storage::TraceStorage;
use crate::config::ProfilerConfig;
use crate::http::{BlockingHttpClient, Headers, HttpClient, HttpRequest, HttpResponse};
use crate::session::SessionManager;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// How a tracer records calls
#[derive(Debug, Clone, PartialEq)]
pub struct TraceOptions {
    /// When false, calls are forwarded and nothing is recorded
    pub enabled: bool,
    /// Maximum recorded body length in bytes; zero or negative records whole bodies
    pub max_body_length: i64,
    /// Replace values of sensitive headers with `***`
    pub mask_sensitive_data: bool,
    /// Record the call site of every request
    pub collect_stack_trace: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_body_length: 10240,
            mask_sensitive_data: true,
            collect_stack_trace: false,
        }
    }
}

impl From<&ProfilerConfig> for TraceOptions {
    fn from(config: &ProfilerConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_body_length: config.max_body_length,
            mask_sensitive_data: config.mask_sensitive_data,
            collect_stack_trace: config.collect_stack_trace,
        }
    }
}

/// Error recorded for a call whose future was dropped before it settled
pub const CANCELLED_ERROR: &str = "request cancelled";

/// Context captured before the wrapped call is made
struct PendingCall {
    timestamp: DateTime<Utc>,
    started: Instant,
    method: String,
    url: String,
    request_headers: Headers,
    request_body: Option<String>,
    stack_trace: Vec<String>,
}

impl PendingCall {
    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Failure entry; `stack_trace` replaces the call-site snapshot when given
    fn into_failure(self, error: String, stack_trace: Option<Vec<String>>) -> TraceEntry {
        let duration_ms = self.elapsed_ms();

        TraceEntry {
            timestamp: self.timestamp,
            method: self.method,
            url: self.url,
            request_headers: self.request_headers,
            request_body: self.request_body,
            response_status: None,
            response_headers: Headers::new(),
            response_body: None,
            duration_ms: Some(duration_ms),
            error: Some(error),
            stack_trace: stack_trace.unwrap_or(self.stack_trace),
        }
    }
}

/// A call that has been dispatched but has not settled yet
///
/// Dropping it unsettled (the caller dropped the future, e.g. on a timeout) records the
/// call as failed with [`CANCELLED_ERROR`].
struct InFlight {
    call: Option<PendingCall>,
    storage: Arc<TraceStorage>,
    sessions: Arc<SessionManager>,
}

impl InFlight {
    fn settle(mut self) -> Option<PendingCall> {
        self.call.take()
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(call) = self.call.take() {
            let entry = call.into_failure(CANCELLED_ERROR.to_string(), None);
            record(&self.storage, &self.sessions, entry);
        }
    }
}

/// Decorator recording a [`TraceEntry`] for every call of the wrapped client
pub struct HttpTracer<C> {
    inner: C,
    storage: Arc<TraceStorage>,
    sessions: Arc<SessionManager>,
    options: TraceOptions,
}

impl<C> HttpTracer<C> {
    /// Wrap a client
    ///
    /// # Arguments
    ///
    /// * `inner` - The client performing the actual requests
    /// * `storage` - Receives every entry
    /// * `sessions` - Receives every entry while a session is active
    /// * `options` - Masking, truncation and stack trace settings
    pub fn new(
        inner: C,
        storage: Arc<TraceStorage>,
        sessions: Arc<SessionManager>,
        options: TraceOptions,
    ) -> Self {
        Self {
            inner,
            storage,
            sessions,
            options,
        }
    }

    pub fn options(&self) -> &TraceOptions {
        &self.options
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn headers(&self, headers: &Headers) -> Headers {
        if self.options.mask_sensitive_data {
            mask_sensitive_headers(headers)
        } else {
            headers.clone()
        }
    }

    fn body(&self, body: Option<String>) -> Option<String> {
        body.map(|body| truncate_body(body, self.options.max_body_length))
    }

    fn begin(&self, request: &HttpRequest) -> InFlight {
        let timestamp = Utc::now();
        let started = Instant::now();

        let stack_trace = if self.options.collect_stack_trace {
            capture_stack_trace()
        } else {
            Vec::new()
        };

        let call = PendingCall {
            timestamp,
            started,
            method: request.method.clone(),
            url: request.url.clone(),
            request_headers: self.headers(&request.headers),
            request_body: self.body(stringify_request_body(request)),
            stack_trace,
        };

        InFlight {
            call: Some(call),
            storage: Arc::clone(&self.storage),
            sessions: Arc::clone(&self.sessions),
        }
    }

    fn record_success(&self, in_flight: InFlight, response: &HttpResponse) {
        let Some(call) = in_flight.settle() else {
            return;
        };
        let duration_ms = call.elapsed_ms();

        let entry = TraceEntry {
            timestamp: call.timestamp,
            method: call.method,
            url: call.url,
            request_headers: call.request_headers,
            request_body: call.request_body,
            response_status: Some(response.status),
            response_headers: self.headers(&response.headers),
            response_body: self.body(stringify_response_body(&response.body)),
            duration_ms: Some(duration_ms),
            error: None,
            stack_trace: call.stack_trace,
        };
        record(&self.storage, &self.sessions, entry);
    }

    fn record_failure(&self, in_flight: InFlight, error: &(dyn Error + 'static)) {
        let Some(call) = in_flight.settle() else {
            return;
        };

        let stack_trace = failure_trace(error).filter(|_| self.options.collect_stack_trace);

        let entry = call.into_failure(error.to_string(), stack_trace);
        record(&self.storage, &self.sessions, entry);
    }
}

fn record(storage: &TraceStorage, sessions: &SessionManager, entry: TraceEntry) {
    debug!(
        method = %entry.method,
        url = %entry.url,
        status = ?entry.response_status,
        duration_ms = ?entry.duration_ms,
        error = ?entry.error,
        "Recorded HTTP trace"
    );

    storage.add(entry.clone());
    sessions.add_trace(entry);
}

#[async_trait]
impl<C> HttpClient for HttpTracer<C>
where
    C: HttpClient,
{
    type Error = C::Error;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        if !self.options.enabled {
            return self.inner.send(request).await;
        }

        let in_flight = self.begin(&request);
        let outcome = self.inner.send(request).await;

        match &outcome {
            Ok(response) => self.record_success(in_flight, response),
            Err(error) => self.record_failure(in_flight, error),
        }

        outcome
    }
}

impl<C> BlockingHttpClient for HttpTracer<C>
where
    C: BlockingHttpClient,
{
    type Error = C::Error;

    fn send_blocking(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        if !self.options.enabled {
            return self.inner.send_blocking(request);
        }

        let in_flight = self.begin(&request);
        let outcome = self.inner.send_blocking(request);

        match &outcome {
            Ok(response) => self.record_success(in_flight, response),
            Err(error) => self.record_failure(in_flight, error),
        }

        outcome
    }
}
