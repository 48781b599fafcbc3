use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::rates::{RateFetch, RateProvider, RateTable};

/// Client for the exchangerate-api.com latest-rates feed.
pub struct ExchangeRateApiProvider {
    base_url: String,
    base_currency: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, base_currency: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.to_string(),
            base_currency: base_currency.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
    time_last_updated: i64,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "RateFetch", skip(self))]
    async fn fetch(&self) -> Result<RateFetch> {
        let url = format!("{}/v4/latest/{}", self.base_url, self.base_currency);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("cambio/1.0")
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from exchange rate feed",
                response.status()
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse exchange rate response: {}", e))?;

        if data.rates.is_empty() {
            return Err(anyhow!("Exchange rate feed returned no rates"));
        }

        let updated_at = Utc
            .timestamp_opt(data.time_last_updated, 0)
            .single()
            .ok_or_else(|| anyhow!("Invalid feed timestamp: {}", data.time_last_updated))?;

        Ok(RateFetch {
            table: RateTable::new(data.rates),
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_response = r#"{
            "rates": {
                "USD": 1,
                "EUR": 0.85,
                "GBP": 0.73
            },
            "time_last_updated": 1700000000
        }"#;

        let mock_server = create_mock_server(mock_response).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");

        let fetch = provider.fetch().await.unwrap();
        assert_eq!(fetch.table.len(), 3);
        assert_eq!(fetch.table.get("EUR"), Some(0.85));
        assert_eq!(fetch.updated_at.timestamp(), 1700000000);
    }

    #[tokio::test]
    async fn test_base_entry_inserted_when_missing() {
        let mock_response = r#"{
            "rates": { "EUR": 0.85 },
            "time_last_updated": 1700000000
        }"#;

        let mock_server = create_mock_server(mock_response).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");

        let fetch = provider.fetch().await.unwrap();
        assert_eq!(fetch.table.get("USD"), Some(1.0));
    }

    #[tokio::test]
    async fn test_empty_rates_is_an_error() {
        let mock_response = r#"{ "rates": {}, "time_last_updated": 1700000000 }"#;

        let mock_server = create_mock_server(mock_response).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");

        let result = provider.fetch().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Exchange rate feed returned no rates"
        );
    }

    #[tokio::test]
    async fn test_http_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");
        let result = provider.fetch().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error from exchange rate feed"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        // "conversion_rates" instead of "rates"
        let mock_response = r#"{ "conversion_rates": {}, "time_last_updated": 1700000000 }"#;

        let mock_server = create_mock_server(mock_response).await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), "USD");

        let result = provider.fetch().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse exchange rate response")
        );
    }
}
