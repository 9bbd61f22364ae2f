use crate::http::models::{HttpRequest, HttpResponse};
use async_trait::async_trait;

/// Asynchronous HTTP client capability
///
/// Any client family is adapted to this trait at the edge; tracers decorate it without
/// knowing which library performs the request.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Failure type of the underlying client, handed back to callers unchanged
    type Error: std::error::Error + Send + Sync + 'static;

    /// Perform a request and wait for the complete response
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}

/// Blocking HTTP client capability
pub trait BlockingHttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send_blocking(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}

#[async_trait]
impl<T> HttpClient for std::sync::Arc<T>
where
    T: HttpClient + ?Sized,
{
    type Error = T::Error;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        (**self).send(request).await
    }
}

impl<T> BlockingHttpClient for std::sync::Arc<T>
where
    T: BlockingHttpClient + ?Sized,
{
    type Error = T::Error;

    fn send_blocking(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        (**self).send_blocking(request)
    }
}
