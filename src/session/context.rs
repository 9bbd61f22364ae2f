use std::fmt;

/// Environment variable marking a background worker process
pub const WORKER_ENV_VAR: &str = "HTTP_PROFILER_WORKER";

/// Set by CGI-style web servers for every request they hand to a process
pub const CGI_ENV_VAR: &str = "GATEWAY_INTERFACE";

/// Kind of execution a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Cli,
    Web,
    Worker,
}

impl ExecutionContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionContext::Cli => "cli",
            ExecutionContext::Web => "web",
            ExecutionContext::Worker => "worker",
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ExecutionContext> for String {
    fn from(context: ExecutionContext) -> Self {
        context.as_str().to_string()
    }
}

/// Classifies the running process from its environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextDetector;

impl ContextDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self) -> ExecutionContext {
        self.detect_with(|name| std::env::var_os(name).is_some())
    }

    /// Classify using `is_set` to test whether an environment variable is present
    pub fn detect_with<F>(&self, is_set: F) -> ExecutionContext
    where
        F: Fn(&str) -> bool,
    {
        if is_set(WORKER_ENV_VAR) {
            ExecutionContext::Worker
        } else if is_set(CGI_ENV_VAR) {
            ExecutionContext::Web
        } else {
            ExecutionContext::Cli
        }
    }
}
