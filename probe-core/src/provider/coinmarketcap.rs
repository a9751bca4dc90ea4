//! CoinMarketCap global market metrics.

use serde_json::Value;
use std::time::Duration;

use crate::{
    error::{FetchError, TransportKind},
    model::{FieldBag, NOT_AVAILABLE},
    transport::{ApiRequest, HttpTransport, Transport},
    units::field_or,
};

pub const GLOBAL_METRICS_URL: &str =
    "https://pro-api.coinmarketcap.com/v1/global-metrics/quotes/latest";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Fetches a snapshot of global crypto market metrics.
#[derive(Debug, Clone)]
pub struct MarketSnapshotFetcher<T: Transport = HttpTransport> {
    transport: T,
    api_key: String,
    endpoint: String,
}

impl<T: Transport> MarketSnapshotFetcher<T> {
    pub fn new(transport: T, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            endpoint: GLOBAL_METRICS_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// One GET, then envelope validation and field extraction.
    ///
    /// A rejected envelope is not an error: it yields an empty [`FieldBag`].
    pub async fn fetch(&self) -> Result<FieldBag, FetchError> {
        let request = ApiRequest::get(self.endpoint.as_str())
            .header("Accepts", "application/json")
            .header(API_KEY_HEADER, self.api_key.as_str())
            .timeout(REQUEST_TIMEOUT);

        let body = self.transport.get(&request).await?;
        let doc: Value = serde_json::from_str(&body)?;

        Ok(extract_snapshot(&doc))
    }
}

/// Pull the display fields out of a global-metrics document.
pub fn extract_snapshot(doc: &Value) -> FieldBag {
    let mut bag = FieldBag::new();

    let error_code = doc.pointer("/status/error_code").and_then(Value::as_f64);
    if error_code != Some(0.0) {
        tracing::warn!(?error_code, "CoinMarketCap envelope rejected");
        return bag;
    }

    let Some(data) = doc.get("data").filter(|d| d.is_object()) else {
        tracing::warn!("CoinMarketCap envelope has no data object");
        return bag;
    };

    bag.insert(
        "total_cryptocurrencies",
        field_or(data, "total_cryptocurrencies", NOT_AVAILABLE),
    );
    bag.insert(
        "active_cryptocurrencies",
        field_or(data, "active_cryptocurrencies", NOT_AVAILABLE),
    );

    if let Some(usd) = data.pointer("/quote/USD").filter(|q| q.is_object()) {
        bag.insert(
            "total_market_cap",
            format!("$ {}", field_or(usd, "total_market_cap", NOT_AVAILABLE)),
        );
        bag.insert(
            "total_volume_24h",
            format!("$ {}", field_or(usd, "total_volume_24h", NOT_AVAILABLE)),
        );
    }

    bag
}

/// Console message for a failed market fetch.
pub fn describe_failure(err: &FetchError) -> String {
    match err {
        FetchError::Transport(t) => match t.kind {
            TransportKind::Connect => {
                "Error: Failed to connect with the CoinMarketCap API.".to_string()
            }
            TransportKind::Timeout => "Error: Request to the CoinMarketCap API timed out.".to_string(),
            TransportKind::Redirect => "Too many redirects when accessing the API.".to_string(),
            TransportKind::Status(_) | TransportKind::Request => {
                format!("An error occurred while making the request: {t}")
            }
        },
        FetchError::MalformedResponse(_) => "Error: Failed to parse JSON response".to_string(),
        other => format!("An error occurred: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::TransportError, transport::testing::ScriptedTransport};
    use serde_json::json;

    const FULL_BODY: &str = r#"{
        "status": { "error_code": 0, "error_message": null },
        "data": {
            "total_cryptocurrencies": 9921,
            "active_cryptocurrencies": 2466,
            "quote": {
                "USD": {
                    "total_market_cap": 2514823000000.5,
                    "total_volume_24h": 84123456789
                }
            }
        }
    }"#;

    #[tokio::test]
    async fn fetch_sends_auth_headers_and_timeout() {
        let fetcher = MarketSnapshotFetcher::new(ScriptedTransport::new().reply(FULL_BODY), "CMC_KEY");
        fetcher.fetch().await.expect("fetch should succeed");

        let requests = fetcher.transport.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.url, GLOBAL_METRICS_URL);
        assert_eq!(req.header_value("X-CMC_PRO_API_KEY"), Some("CMC_KEY"));
        assert_eq!(req.header_value("Accepts"), Some("application/json"));
        assert_eq!(req.timeout, Some(REQUEST_TIMEOUT));
    }

    #[tokio::test]
    async fn fetch_extracts_all_fields() {
        let fetcher = MarketSnapshotFetcher::new(ScriptedTransport::new().reply(FULL_BODY), "K");
        let bag = fetcher.fetch().await.expect("fetch should succeed");

        let keys: Vec<_> = bag.keys().collect();
        assert_eq!(
            keys,
            [
                "total_cryptocurrencies",
                "active_cryptocurrencies",
                "total_market_cap",
                "total_volume_24h"
            ]
        );
        assert_eq!(bag.get("total_cryptocurrencies"), Some("9921"));
        assert_eq!(bag.get("active_cryptocurrencies"), Some("2466"));
        assert_eq!(bag.get("total_market_cap"), Some("$ 2514823000000.5"));
        assert_eq!(bag.get("total_volume_24h"), Some("$ 84123456789"));
    }

    #[tokio::test]
    async fn fetch_uses_endpoint_override() {
        let fetcher = MarketSnapshotFetcher::new(ScriptedTransport::new().reply(FULL_BODY), "K")
            .with_endpoint("http://localhost:9000/metrics");
        fetcher.fetch().await.expect("fetch should succeed");

        assert_eq!(fetcher.transport.requests()[0].url, "http://localhost:9000/metrics");
    }

    #[tokio::test]
    async fn fetch_propagates_transport_error() {
        let transport = ScriptedTransport::new()
            .fail(TransportError::new(TransportKind::Status(401), "unauthorized"));
        let err = MarketSnapshotFetcher::new(transport, "bad").fetch().await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::Transport(TransportError { kind: TransportKind::Status(401), .. })
        ));
    }

    #[tokio::test]
    async fn fetch_rejects_non_json_body() {
        let fetcher =
            MarketSnapshotFetcher::new(ScriptedTransport::new().reply("<html>busy</html>"), "K");
        let err = fetcher.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::MalformedResponse(_)));
        assert_eq!(describe_failure(&err), "Error: Failed to parse JSON response");
    }

    #[tokio::test]
    async fn repeated_fetches_are_identical() {
        let transport = ScriptedTransport::new().reply(FULL_BODY).reply(FULL_BODY);
        let fetcher = MarketSnapshotFetcher::new(transport, "K");

        let first = fetcher.fetch().await.unwrap();
        let second = fetcher.fetch().await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn non_zero_error_code_yields_empty_bag() {
        let doc = json!({
            "status": { "error_code": 1002, "error_message": "API key missing." },
            "data": { "total_cryptocurrencies": 1 }
        });

        assert!(extract_snapshot(&doc).is_empty());
    }

    #[test]
    fn float_zero_error_code_is_accepted() {
        let doc = json!({ "status": { "error_code": 0.0 }, "data": { "total_cryptocurrencies": 7 } });
        assert_eq!(extract_snapshot(&doc).get("total_cryptocurrencies"), Some("7"));
    }

    #[test]
    fn missing_status_or_data_yields_empty_bag() {
        assert!(extract_snapshot(&json!({ "data": { "total_cryptocurrencies": 1 } })).is_empty());
        assert!(extract_snapshot(&json!({ "status": { "error_code": 0 } })).is_empty());
        assert!(extract_snapshot(&json!({ "status": { "error_code": 0 }, "data": [] })).is_empty());
    }

    #[test]
    fn absent_counts_default_to_placeholder() {
        let doc = json!({ "status": { "error_code": 0 }, "data": {} });
        let bag = extract_snapshot(&doc);

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get("total_cryptocurrencies"), Some("N/A"));
        assert_eq!(bag.get("active_cryptocurrencies"), Some("N/A"));
    }

    #[test]
    fn quote_fields_require_quote_and_usd() {
        let without_usd = json!({
            "status": { "error_code": 0 },
            "data": { "total_cryptocurrencies": 5, "quote": { "EUR": {} } }
        });
        let bag = extract_snapshot(&without_usd);
        assert!(!bag.contains_key("total_market_cap"));
        assert!(!bag.contains_key("total_volume_24h"));

        let empty_usd = json!({
            "status": { "error_code": 0 },
            "data": { "quote": { "USD": {} } }
        });
        let bag = extract_snapshot(&empty_usd);
        assert_eq!(bag.get("total_market_cap"), Some("$ N/A"));
        assert_eq!(bag.get("total_volume_24h"), Some("$ N/A"));
    }

    #[test]
    fn failure_messages_by_kind() {
        let msg = |kind| describe_failure(&FetchError::from(TransportError::new(kind, "boom")));

        assert_eq!(
            msg(TransportKind::Connect),
            "Error: Failed to connect with the CoinMarketCap API."
        );
        assert_eq!(
            msg(TransportKind::Timeout),
            "Error: Request to the CoinMarketCap API timed out."
        );
        assert_eq!(msg(TransportKind::Redirect), "Too many redirects when accessing the API.");
        assert_eq!(
            msg(TransportKind::Status(500)),
            "An error occurred while making the request: boom"
        );
        assert_eq!(
            describe_failure(&FetchError::Resolution),
            "An error occurred: Could not fetch latitude and longitude."
        );
    }
}
