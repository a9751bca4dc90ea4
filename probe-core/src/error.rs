//! Typed failures surfaced by the fetchers.
//!
//! [`TransportError`] describes what went wrong on the wire, [`FetchError`]
//! is what callers of the fetchers match on.

use thiserror::Error;

/// Coarse classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Could not establish a connection.
    Connect,
    /// The request did not complete within its timeout.
    Timeout,
    /// The redirect limit was exceeded.
    Redirect,
    /// The server answered with a non-success HTTP status.
    Status(u16),
    /// Any other request failure (bad URL, invalid header, body read error...).
    Request,
}

/// A failed HTTP round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Non-success status with the (truncated) response body attached.
    pub fn status(code: u16, url: &str, body: &str) -> Self {
        Self::new(
            TransportKind::Status(code),
            format!("Request to {url} failed with status {code}: {}", truncate_body(body)),
        )
    }
}

impl TransportKind {
    /// A connect timeout reports both flags; it counts as a connection failure.
    pub fn classify(connect: bool, timeout: bool, redirect: bool, status: Option<u16>) -> Self {
        if connect {
            TransportKind::Connect
        } else if timeout {
            TransportKind::Timeout
        } else if redirect {
            TransportKind::Redirect
        } else if let Some(code) = status {
            TransportKind::Status(code)
        } else {
            TransportKind::Request
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = TransportKind::classify(
            err.is_connect(),
            err.is_timeout(),
            err.is_redirect(),
            err.status().map(|s| s.as_u16()),
        );

        // Drop the URL: it may carry an `appid` query parameter.
        Self::new(kind, err.without_url().to_string())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// Required user input was missing.
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Transport failure wrapped with the stage that hit it.
    #[error("Network error while fetching {what}.")]
    Network {
        what: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("Failed to parse JSON response: {0}")]
    MalformedResponse(String),

    /// The geocoder returned no match for the query.
    #[error("Could not fetch latitude and longitude.")]
    Resolution,

    /// The weather body carried an application code other than 200.
    #[error("Error fetching weather information (cod: {0}).")]
    WeatherUnavailable(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

impl FetchError {
    pub fn missing_field(path: &str) -> Self {
        FetchError::MalformedResponse(format!("missing or invalid field `{path}`"))
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self, FetchError::InvalidInput(_))
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
