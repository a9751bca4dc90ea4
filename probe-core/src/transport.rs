//! The HTTP seam the fetchers talk through.
//!
//! Fetchers only need "GET this URL with these headers, give me the body or a
//! [`TransportError`]". [`HttpTransport`] does that with `reqwest`; tests plug
//! in a scripted implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

use crate::error::TransportError;

/// A single outgoing GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into(), headers: Vec::new(), timeout: None }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    /// URL without its query string, safe to log.
    pub fn endpoint(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }
}

#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Perform the request; any non-2xx status is an error.
    async fn get(&self, request: &ApiRequest) -> Result<String, TransportError>;
}

/// `reqwest`-backed transport. Clone it freely, the client is shared.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ApiRequest) -> Result<String, TransportError> {
        let mut builder = self.http.get(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(endpoint = request.endpoint(), "sending GET");

        let res = builder.send().await?;
        let status = res.status();
        let body = res.text().await?;

        tracing::debug!(endpoint = request.endpoint(), %status, bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), request.endpoint(), &body));
        }

        Ok(body)
    }
}
