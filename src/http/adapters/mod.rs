//! Adapters that bring concrete HTTP client libraries under the
//! [`HttpClient`](crate::http::HttpClient) and
//! [`BlockingHttpClient`](crate::http::BlockingHttpClient) capabilities.

pub mod blocking_reqwest;
pub mod reqwest_client;

pub use blocking_reqwest::BlockingReqwestClient;
pub use reqwest_client::ReqwestClient;

use crate::http::models::Headers;
use thiserror::Error;

/// Failures raised by the bundled reqwest adapters
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
}

pub(crate) fn parse_method(method: &str) -> Result<reqwest::Method, TransportError> {
    reqwest::Method::from_bytes(method.as_bytes())
        .map_err(|_| TransportError::InvalidMethod(method.to_string()))
}

pub(crate) fn collect_headers(map: &reqwest::header::HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    headers
}
