use std::future::Future;
use std::time::Duration;

use burstr_http::{HttpClient, HttpRequest, HttpTransportErrorKind};

/// Why a single GET did not produce a status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub kind: HttpTransportErrorKind,
    pub message: String,
}

impl RequestFailure {
    pub fn new(kind: HttpTransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<burstr_http::Error> for RequestFailure {
    fn from(err: burstr_http::Error) -> Self {
        Self {
            kind: err.transport_error_kind(),
            message: err.to_string(),
        }
    }
}

/// One attempt at fetching `url`. Implementations must not retry.
pub trait Transport: Send + Sync + 'static {
    fn get(&self, url: &str) -> impl Future<Output = Result<u16, RequestFailure>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
    request_timeout: Option<Duration>,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: HttpClient, request_timeout: Option<Duration>) -> Self {
        Self {
            client,
            request_timeout,
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<u16, RequestFailure> {
        let req = HttpRequest::get(url).with_timeout(self.request_timeout);
        let res = self.client.request(req).await?;
        Ok(res.status)
    }
}
