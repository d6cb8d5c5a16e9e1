use super::util::{RetryPolicy, with_retry};
use crate::core::config::PriceFeedConfig;
use crate::core::price::{IngestionFailure, PriceBook, PriceObservation, SnapshotProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

#[derive(Debug, Deserialize)]
struct SnapshotEntry {
    currency: String,
    date: DateTime<Utc>,
    price: f64,
}

impl From<SnapshotEntry> for PriceObservation {
    fn from(entry: SnapshotEntry) -> Self {
        PriceObservation {
            symbol: entry.currency,
            observed_at: entry.date,
            price: entry.price,
        }
    }
}

/// Fetches the whole price snapshot with a single GET.
pub struct HttpSnapshotProvider {
    url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpSnapshotProvider {
    pub fn new(url: &str) -> Self {
        HttpSnapshotProvider {
            url: url.to_string(),
            timeout: PriceFeedConfig::default().timeout(),
            retry: RetryPolicy::NONE,
        }
    }

    pub fn from_config(config: &PriceFeedConfig) -> Self {
        HttpSnapshotProvider {
            url: config.url.clone(),
            timeout: config.timeout(),
            retry: RetryPolicy::from(config),
        }
    }
}

#[async_trait]
impl SnapshotProvider for HttpSnapshotProvider {
    #[instrument(name = "SnapshotFetch", skip(self), fields(url = %self.url))]
    async fn fetch_snapshot(&self) -> Result<Vec<PriceObservation>> {
        let client = reqwest::Client::builder()
            .user_agent("tokenswap/0.1")
            .timeout(self.timeout)
            .build()?;

        let response = with_retry(
            || async { client.get(&self.url).send().await?.error_for_status() },
            self.retry,
        )
        .await
        .with_context(|| format!("Request error for URL: {}", self.url))?;

        debug!(status = %response.status(), "Received snapshot response");

        let body = response
            .text()
            .await
            .context("Failed to get response text")?;
        let entries: Vec<SnapshotEntry> =
            serde_json::from_str(&body).context("Failed to parse price snapshot")?;

        debug!(count = entries.len(), "Parsed snapshot entries");
        Ok(entries.into_iter().map(PriceObservation::from).collect())
    }
}

/// Fetches a snapshot and builds a fresh book from it.
///
/// Any fetch or decode failure collapses into an opaque `IngestionFailure`;
/// the cause is logged.
pub async fn load_price_book(
    provider: &(dyn SnapshotProvider + Send + Sync),
) -> Result<PriceBook, IngestionFailure> {
    match provider.fetch_snapshot().await {
        Ok(observations) => {
            let book = PriceBook::build(&observations);
            debug!(
                observations = observations.len(),
                symbols = book.len(),
                "Built price book"
            );
            Ok(book)
        }
        Err(e) => {
            error!(error = ?e, "Error fetching prices");
            Err(IngestionFailure {
                reason: format!("{e:#}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"[
        { "currency": "BTC", "date": "2023-01-01T00:00:00Z", "price": 50000 },
        { "currency": "BTC", "date": "2023-01-02T00:00:00Z", "price": 55000 },
        { "currency": "ETH", "date": "2023-01-01T00:00:00Z", "price": 2000 },
        { "currency": "USDT", "date": "2023-01-01T00:00:00Z", "price": 1 },
        { "currency": "ZERO", "date": "2023-01-01T00:00:00Z", "price": 0 }
    ]"#;

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prices.json"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider_for(server: &MockServer) -> HttpSnapshotProvider {
        HttpSnapshotProvider::new(&format!("{}/prices.json", server.uri()))
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let mock_server = create_mock_server(200, MOCK_JSON).await;
        let provider = provider_for(&mock_server);

        let observations = provider.fetch_snapshot().await.unwrap();

        assert_eq!(observations.len(), 5);
        assert_eq!(observations[1].symbol, "BTC");
        assert_eq!(observations[1].price, 55000.0);
        assert_eq!(
            observations[1].observed_at.to_rfc3339(),
            "2023-01-02T00:00:00+00:00"
        );
    }

    #[tokio::test]
    async fn test_load_price_book() {
        let mock_server = create_mock_server(200, MOCK_JSON).await;
        let provider = provider_for(&mock_server);

        let book = load_price_book(&provider).await.unwrap();

        assert_eq!(book.symbols(), vec!["BTC", "ETH", "USDT"]);
        assert_eq!(book.price("BTC"), Some(55000.0));
    }

    #[tokio::test]
    async fn test_fractional_second_dates() {
        let body = r#"[{ "currency": "ATOM", "date": "2023-08-29T07:10:40.000Z", "price": 7.18 }]"#;
        let mock_server = create_mock_server(200, body).await;

        let book = load_price_book(&provider_for(&mock_server)).await.unwrap();
        assert_eq!(book.price("ATOM"), Some(7.18));
    }

    #[tokio::test]
    async fn test_non_success_status_is_ingestion_failure() {
        let mock_server = create_mock_server(500, "oops").await;

        let err = load_price_book(&provider_for(&mock_server))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to load token prices");
        assert!(err.reason.contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_ingestion_failure() {
        let mock_server = create_mock_server(200, r#"{"not": "an array"}"#).await;

        let err = load_price_book(&provider_for(&mock_server))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to load token prices");
        assert!(err.reason.contains("Failed to parse price snapshot"));
    }

    #[tokio::test]
    async fn test_missing_field_is_ingestion_failure() {
        let body = r#"[{ "currency": "BTC", "price": 1 }]"#;
        let mock_server = create_mock_server(200, body).await;

        assert!(load_price_book(&provider_for(&mock_server)).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_snapshot_gives_empty_book() {
        let mock_server = create_mock_server(200, "[]").await;

        let book = load_price_book(&provider_for(&mock_server)).await.unwrap();
        assert!(book.is_empty());
    }

    #[tokio::test]
    async fn test_retries_from_config() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MOCK_JSON))
            .mount(&mock_server)
            .await;

        let config = PriceFeedConfig {
            url: format!("{}/prices.json", mock_server.uri()),
            retries: 2,
            retry_delay_ms: 1,
            timeout_secs: 5,
        };
        let provider = HttpSnapshotProvider::from_config(&config);

        let book = load_price_book(&provider).await.unwrap();
        assert_eq!(book.len(), 3);
    }
}
