pub mod caching;
pub mod exchange_rate_api;
pub mod frankfurter;
pub mod newsapi;
