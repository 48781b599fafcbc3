//! Rate table, conversion arithmetic and the live rate feed contract.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every rate is expressed as units of a currency per one unit of this base.
pub const BASE_CURRENCY: &str = "USD";

/// Flat map of 3-letter currency code to its rate against [`BASE_CURRENCY`].
///
/// Replaced wholesale on each successful fetch, never patched in place.
/// Invariant: the base currency's own entry equals 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(mut rates: HashMap<String, f64>) -> Self {
        rates.entry(BASE_CURRENCY.to_string()).or_insert(1.0);
        RateTable { rates }
    }

    /// The fixed table used when the live feed is unreachable.
    pub fn fallback() -> Self {
        let rates = HashMap::from([
            ("USD".to_string(), 1.0),
            ("EUR".to_string(), 0.85),
            ("GBP".to_string(), 0.73),
            ("JPY".to_string(), 110.25),
            ("AUD".to_string(), 1.35),
            ("CAD".to_string(), 1.25),
            ("CHF".to_string(), 0.92),
            ("CNY".to_string(), 6.45),
            ("INR".to_string(), 75.50),
        ]);
        RateTable { rates }
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Codes in display order.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

/// Where the current table came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RateStatus {
    Live { updated_at: DateTime<Utc> },
    Offline,
}

/// The in-memory table plus its provenance for the status line.
#[derive(Debug, Clone)]
pub struct RateSnapshot {
    pub table: RateTable,
    pub status: RateStatus,
}

impl RateSnapshot {
    pub fn live(table: RateTable, updated_at: DateTime<Utc>) -> Self {
        RateSnapshot {
            table,
            status: RateStatus::Live { updated_at },
        }
    }

    /// Fallback snapshot installed when the feed cannot be reached.
    pub fn offline() -> Self {
        RateSnapshot {
            table: RateTable::fallback(),
            status: RateStatus::Offline,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.status == RateStatus::Offline
    }
}

/// A successful pull from the live feed.
#[derive(Debug, Clone)]
pub struct RateFetch {
    pub table: RateTable,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch(&self) -> Result<RateFetch>;
}

/// Snapshot of one conversion, persisted after every successful computation
/// and restored as the initial state on the next run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub result: f64,
}

impl ConversionRecord {
    /// `100 USD = 85.0000 EUR`
    pub fn display_line(&self) -> String {
        format!(
            "{} {} = {:.4} {}",
            self.amount, self.from, self.result, self.to
        )
    }
}

/// Units of `to` per one unit of `from`. `None` when either code is absent.
pub fn cross_rate(rates: &RateTable, from: &str, to: &str) -> Option<f64> {
    Some(rates.get(to)? / rates.get(from)?)
}

/// Computes `amount × rates[to] / rates[from]`.
///
/// Returns `None` when either code is not in the table; the caller keeps its
/// previously displayed result in that case.
pub fn convert(amount: f64, from: &str, to: &str, rates: &RateTable) -> Option<ConversionRecord> {
    let rate = cross_rate(rates, from, to)?;
    Some(ConversionRecord {
        amount,
        from: from.to_string(),
        to: to.to_string(),
        rate,
        result: amount * rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_eur_table() -> RateTable {
        RateTable::new(HashMap::from([
            ("USD".to_string(), 1.0),
            ("EUR".to_string(), 0.85),
        ]))
    }

    #[test]
    fn test_convert_usd_to_eur() {
        let record = convert(100.0, "USD", "EUR", &usd_eur_table()).unwrap();
        assert_eq!(format!("{:.4}", record.result), "85.0000");
        assert_eq!(record.rate, 0.85);
        assert_eq!(record.display_line(), "100 USD = 85.0000 EUR");
    }

    #[test]
    fn test_convert_reversed_pair() {
        let record = convert(100.0, "EUR", "USD", &usd_eur_table()).unwrap();
        assert_eq!(format!("{:.4}", record.result), "117.6471");
    }

    #[test]
    fn test_convert_identity() {
        for code in ["USD", "EUR"] {
            let record = convert(42.5, code, code, &usd_eur_table()).unwrap();
            assert_eq!(record.result, 42.5);
            assert_eq!(record.rate, 1.0);
        }
    }

    #[test]
    fn test_double_swap_restores_result() {
        let table = usd_eur_table();
        let first = convert(100.0, "USD", "EUR", &table).unwrap();
        let swapped = convert(100.0, "EUR", "USD", &table).unwrap();
        let back = convert(100.0, "USD", "EUR", &table).unwrap();
        assert_ne!(first.result, swapped.result);
        assert!((first.result - back.result).abs() < 1e-9);
    }

    #[test]
    fn test_convert_unknown_code_is_noop() {
        assert!(convert(100.0, "USD", "XXX", &usd_eur_table()).is_none());
        assert!(convert(100.0, "XXX", "EUR", &usd_eur_table()).is_none());
    }

    #[test]
    fn test_fallback_table_contents() {
        let table = RateTable::fallback();
        assert_eq!(table.len(), 9);
        assert_eq!(table.get(BASE_CURRENCY), Some(1.0));
        assert_eq!(table.get("JPY"), Some(110.25));
        assert_eq!(table.get("INR"), Some(75.50));
    }

    #[test]
    fn test_new_inserts_base_entry() {
        let table = RateTable::new(HashMap::from([("EUR".to_string(), 0.85)]));
        assert_eq!(table.get(BASE_CURRENCY), Some(1.0));
    }

    #[test]
    fn test_codes_are_sorted() {
        let table = RateTable::fallback();
        let codes = table.codes();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_offline_snapshot() {
        let snapshot = RateSnapshot::offline();
        assert!(snapshot.is_offline());
        assert_eq!(snapshot.table, RateTable::fallback());
    }
}
