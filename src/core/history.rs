//! Historical cross-rate series backing the trend chart.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trailing window length for the chart, in months.
pub const WINDOW_MONTHS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePoint {
    pub date: NaiveDate,
    /// Units of the target currency per one unit of the source.
    pub rate: f64,
}

/// Date-ordered series for one currency pair.
///
/// Rebuilt fully on every fetch, never merged with a prior series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    pub from: String,
    pub to: String,
    pub points: Vec<RatePoint>,
}

impl HistoricalSeries {
    pub fn latest(&self) -> Option<&RatePoint> {
        self.points.last()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetches the trailing-window series for `from`/`to`. Each call is
    /// independent; the caller decides whether the response still matches
    /// its current selection.
    async fn fetch(&self, from: &str, to: &str) -> Result<HistoricalSeries>;
}
