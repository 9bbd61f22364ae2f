pub mod adapters;
pub mod client;
pub mod models;

pub use adapters::{BlockingReqwestClient, ReqwestClient, TransportError};
pub use client::{BlockingHttpClient, HttpClient};
pub use models::{Headers, HttpRequest, HttpResponse, RequestBody};
