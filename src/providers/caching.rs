//! Cache-first provider wrappers.
//!
//! Serve a stored response when one is present, else pass through to the
//! network and keep the success. Errors are never cached: a failed fetch
//! must reach the fallback path on every attempt.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::cache::Cache;
use crate::core::history::{HistoricalSeries, HistoryProvider};
use crate::core::rates::{RateFetch, RateProvider};

/// How long a cached response keeps serving before the network is consulted
/// again.
pub const RESPONSE_TTL: Duration = Duration::from_secs(600);

pub struct CachingRateProvider<T: RateProvider> {
    inner: T,
    cache: Cache<String, RateFetch>,
}

impl<T: RateProvider> CachingRateProvider<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            cache: Cache::new(),
        }
    }
}

#[async_trait]
impl<T: RateProvider + Send + Sync> RateProvider for CachingRateProvider<T> {
    async fn fetch(&self) -> Result<RateFetch> {
        let key = "latest".to_string();
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Serving exchange rates from cache");
            return Ok(cached);
        }
        let result = self.inner.fetch().await?;
        self.cache.put(key, result.clone(), Some(RESPONSE_TTL)).await;
        Ok(result)
    }
}

pub struct CachingHistoryProvider<T: HistoryProvider> {
    inner: T,
    cache: Cache<String, HistoricalSeries>,
}

impl<T: HistoryProvider> CachingHistoryProvider<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            cache: Cache::new(),
        }
    }
}

#[async_trait]
impl<T: HistoryProvider + Send + Sync> HistoryProvider for CachingHistoryProvider<T> {
    async fn fetch(&self, from: &str, to: &str) -> Result<HistoricalSeries> {
        let key = format!("{from}-{to}");
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Serving historical series from cache: {}", key);
            return Ok(cached);
        }
        let result = self.inner.fetch(from, to).await?;
        self.cache.put(key, result.clone(), Some(RESPONSE_TTL)).await;
        Ok(result)
    }
}
