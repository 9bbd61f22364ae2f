use super::{collect_headers, parse_method, TransportError};
use crate::http::client::HttpClient;
use crate::http::models::{HttpRequest, HttpResponse, RequestBody};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Async adapter over [`reqwest::Client`]
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Create an adapter around a default reqwest client
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapt an already configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Create an adapter whose requests fail after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    type Error = TransportError;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let method = parse_method(&request.method)?;
        debug!("Sending {} {}", method, request.url);

        let mut builder = self.client.request(method, &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        for (name, values) in &request.headers {
            for value in values {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        builder = match request.body {
            Some(RequestBody::Text(text)) => builder.body(text),
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes),
            Some(RequestBody::Json(value)) => builder.json(&value),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
