//! Profiler settings supplied by the host

use crate::error::{ProfilerError, Result};
use serde::Deserialize;
use std::path::PathBuf;

pub const ENABLED_VAR: &str = "HTTP_PROFILER_ENABLED";
pub const MAX_BODY_LENGTH_VAR: &str = "HTTP_PROFILER_MAX_BODY_LENGTH";
pub const MASK_SENSITIVE_DATA_VAR: &str = "HTTP_PROFILER_MASK_SENSITIVE_DATA";
pub const COLLECT_STACK_TRACE_VAR: &str = "HTTP_PROFILER_COLLECT_STACK_TRACE";
pub const PERSIST_SESSIONS_VAR: &str = "HTTP_PROFILER_PERSIST_SESSIONS";
pub const STORAGE_DIR_VAR: &str = "HTTP_PROFILER_STORAGE_DIR";

/// Configuration for the profiler
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Record calls at all
    pub enabled: bool,
    /// Maximum recorded body length in bytes; zero or negative disables truncation
    pub max_body_length: i64,
    pub mask_sensitive_data: bool,
    pub collect_stack_trace: bool,
    /// Write ended sessions to the storage directory
    pub persist_sessions: bool,
    /// Defaults to `<current dir>/var/http-profiler`
    pub storage_directory: Option<PathBuf>,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_body_length: 10240,
            mask_sensitive_data: true,
            collect_stack_trace: false,
            persist_sessions: false,
            storage_directory: None,
        }
    }
}

impl ProfilerConfig {
    /// Read `HTTP_PROFILER_*` variables, loading a `.env` file first when present
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from variables returned by `lookup`; unset ones keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENABLED_VAR) {
            config.enabled = parse_bool(ENABLED_VAR, &value)?;
        }

        if let Some(value) = lookup(MAX_BODY_LENGTH_VAR) {
            config.max_body_length = value.trim().parse().map_err(|_| {
                ProfilerError::ConfigError(format!(
                    "{} must be an integer, got {:?}",
                    MAX_BODY_LENGTH_VAR, value
                ))
            })?;
        }

        if let Some(value) = lookup(MASK_SENSITIVE_DATA_VAR) {
            config.mask_sensitive_data = parse_bool(MASK_SENSITIVE_DATA_VAR, &value)?;
        }

        if let Some(value) = lookup(COLLECT_STACK_TRACE_VAR) {
            config.collect_stack_trace = parse_bool(COLLECT_STACK_TRACE_VAR, &value)?;
        }

        if let Some(value) = lookup(PERSIST_SESSIONS_VAR) {
            config.persist_sessions = parse_bool(PERSIST_SESSIONS_VAR, &value)?;
        }

        if let Some(value) = lookup(STORAGE_DIR_VAR) {
            if !value.trim().is_empty() {
                config.storage_directory = Some(PathBuf::from(value));
            }
        }

        Ok(config)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ProfilerError::ConfigError(format!(
            "{} must be a boolean, got {:?}",
            name, value
        ))),
    }
}
