use super::{collect_headers, parse_method, TransportError};
use crate::http::client::BlockingHttpClient;
use crate::http::models::{HttpRequest, HttpResponse, RequestBody};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Blocking adapter over [`reqwest::blocking::Client`]
///
/// Must not be constructed or used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingReqwestClient {
    client: Client,
}

impl BlockingReqwestClient {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Default for BlockingReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockingHttpClient for BlockingReqwestClient {
    type Error = TransportError;

    fn send_blocking(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let method = parse_method(&request.method)?;
        debug!("Sending {} {} (blocking)", method, request.url);

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

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_blocking_post() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/echo")
            .match_body("payload")
            .with_status(200)
            .with_header("set-cookie", "session=abc")
            .with_body("received")
            .create();

        let client = BlockingReqwestClient::new();
        let request = HttpRequest::post(format!("{}/echo", server.url())).with_body("payload");
        let response = client.send_blocking(request).unwrap();

        mock.assert();
        assert_eq!(response.status, 200);
        assert_eq!(response.headers["set-cookie"], vec!["session=abc"]);
        assert_eq!(response.text(), Some("received"));
    }

    #[test]
    fn test_send_blocking_connection_refused() {
        let client = BlockingReqwestClient::new();
        let result = client.send_blocking(HttpRequest::get("http://127.0.0.1:1/"));

        assert!(matches!(result, Err(TransportError::Http(_))));
    }
}
