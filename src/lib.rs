pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod profiler;
pub mod session;
pub mod tracer;

mod timestamp;

pub use config::ProfilerConfig;
pub use error::{ProfilerError, Result};
pub use profiler::{ProfileSnapshot, Profiler};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::ProfilerConfig;
    pub use crate::error::{ProfilerError, Result};
    pub use crate::http::{
        BlockingHttpClient, BlockingReqwestClient, HttpClient, HttpRequest, HttpResponse,
        ReqwestClient,
    };
    pub use crate::profiler::Profiler;
    pub use crate::session::{SessionManager, SessionReader};
    pub use crate::tracer::{HttpTracer, TraceEntry, TraceOptions, TraceStorage};
}
