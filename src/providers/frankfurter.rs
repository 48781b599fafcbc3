use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Months, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

use crate::core::history::{HistoricalSeries, HistoryProvider, RatePoint, WINDOW_MONTHS};

/// Client for the frankfurter.app date-range endpoint.
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct RangeResponse {
    // BTreeMap keeps the ISO date keys in chronological order.
    rates: BTreeMap<String, HashMap<String, f64>>,
}

fn window_start(end: NaiveDate) -> NaiveDate {
    end.checked_sub_months(Months::new(WINDOW_MONTHS))
        .unwrap_or(end)
}

#[async_trait]
impl HistoryProvider for FrankfurterProvider {
    #[instrument(name = "HistoryFetch", skip(self))]
    async fn fetch(&self, from: &str, to: &str) -> Result<HistoricalSeries> {
        let end = Utc::now().date_naive();
        let start = window_start(end);
        let url = format!("{}/{}..{}?from={}&to={}", self.base_url, start, end, from, to);
        debug!("Requesting historical rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("cambio/1.0")
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for pair: {}/{}", e, from, to))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for pair: {}/{}",
                response.status(),
                from,
                to
            ));
        }

        let text = response.text().await?;
        let data: RangeResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse historical response for {}/{}: {}", from, to, e))?;

        let mut points = Vec::with_capacity(data.rates.len());
        for (date, rates) in &data.rates {
            let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
                debug!("Skipping unparseable date key: {date}");
                continue;
            };
            // Dates missing the target code are skipped, not zero-filled.
            if let Some(rate) = rates.get(to) {
                points.push(RatePoint { date, rate: *rate });
            }
        }

        Ok(HistoricalSeries {
            from: from.to_string(),
            to: to.to_string(),
            points,
        })
    }
}
