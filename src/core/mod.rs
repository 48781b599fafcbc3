//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod flags;
pub mod history;
pub mod i18n;
pub mod log;
pub mod news;
pub mod rates;
pub mod theme;

// Re-export main types for cleaner imports
pub use history::{HistoricalSeries, HistoryProvider, RatePoint};
pub use i18n::Language;
pub use news::{Article, NewsProvider};
pub use rates::{ConversionRecord, RateProvider, RateSnapshot, RateTable};
pub use theme::Theme;
