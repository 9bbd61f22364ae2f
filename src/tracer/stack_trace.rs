//! Best-effort call-site capture for trace entries

use regex::Regex;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::sync::OnceLock;

const INTERNAL_LOCATION: &str = "[internal]:0";

fn frame_index_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+:\s+").expect("valid frame index pattern"))
}

fn location_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^at\s+(.+?):(\d+)(?::\d+)?$").expect("valid frame location pattern")
    })
}

/// Frames of the current thread's stack, innermost first
///
/// Returns an empty list where the platform cannot walk the stack.
pub fn capture_stack_trace() -> Vec<String> {
    let backtrace = Backtrace::force_capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }

    parse_backtrace(&backtrace.to_string())
}

/// Turn the rendered form of a [`Backtrace`] into `<file>:<line> <function>` frames
///
/// Leading frames that belong to the capture machinery itself are dropped.
pub fn parse_backtrace(rendered: &str) -> Vec<String> {
    let mut frames: Vec<(String, Option<String>)> = Vec::new();

    for line in rendered.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = location_pattern().captures(line) {
            if let Some((_, location)) = frames.last_mut() {
                if location.is_none() {
                    *location = Some(format!("{}:{}", &caps[1], &caps[2]));
                }
            }
            continue;
        }

        let function = frame_index_pattern().replace(line, "").into_owned();
        frames.push((function, None));
    }

    frames
        .into_iter()
        .skip_while(|(function, _)| is_capture_frame(function))
        .map(|(function, location)| {
            format!("{} {}", location.as_deref().unwrap_or(INTERNAL_LOCATION), function)
        })
        .collect()
}

fn is_capture_frame(function: &str) -> bool {
    function.starts_with("std::backtrace")
        || function.starts_with("http_profiler::tracer::stack_trace::")
        || function.contains("http_profiler::tracer::http_tracer::HttpTracer")
}

/// Trace derived from a failure's own cause chain
///
/// Only errors that carry at least one `source()` yield a trace; the error itself is
/// frame `#0` and each cause follows in order.
pub fn failure_trace(error: &(dyn Error + 'static)) -> Option<Vec<String>> {
    error.source()?;

    let mut frames = Vec::new();
    let mut current = Some(error);
    while let Some(err) = current {
        frames.push(format!("#{} {}", frames.len(), err));
        current = err.source();
    }

    Some(frames)
}
