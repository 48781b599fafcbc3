pub mod app;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use anyhow::Result;
use tracing::{debug, info};

use crate::app::App;
use crate::core::config::AppConfig;
use crate::core::theme::Theme;
use crate::providers::caching::{CachingHistoryProvider, CachingRateProvider};
use crate::providers::exchange_rate_api::ExchangeRateApiProvider;
use crate::providers::frankfurter::FrankfurterProvider;
use crate::providers::newsapi::NewsApiProvider;
use crate::store::PrefStore;

#[derive(Debug, Clone)]
pub enum AppCommand {
    Dashboard,
    Convert {
        amount: Option<f64>,
        from: Option<String>,
        to: Option<String>,
    },
    Swap,
    Rates,
    Chart {
        from: Option<String>,
        to: Option<String>,
    },
    News,
    FavToggle { code: String },
    FavAdd { code: String },
    FavRemove { code: String },
    FavList,
    FavUse { code: String },
    Theme { theme: Option<Theme> },
    Language { code: Option<String> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let rates_base_url = config
        .providers
        .rates
        .as_ref()
        .map_or("https://api.exchangerate-api.com", |p| &p.base_url);
    let rate_provider = CachingRateProvider::new(ExchangeRateApiProvider::new(
        rates_base_url,
        &config.base_currency,
    ));

    let history_base_url = config
        .providers
        .history
        .as_ref()
        .map_or("https://api.frankfurter.app", |p| &p.base_url);
    let history_provider = CachingHistoryProvider::new(FrankfurterProvider::new(history_base_url));

    let (news_base_url, news_api_key) = config
        .providers
        .news
        .as_ref()
        .map_or(("https://newsapi.org", "YOUR_NEWS_API_KEY"), |p| {
            (p.base_url.as_str(), p.api_key.as_str())
        });
    let news_provider = NewsApiProvider::new(news_base_url, news_api_key);

    let store = PrefStore::open(&config.default_data_path()?)?;

    let mut app = App::new(
        Box::new(rate_provider),
        Box::new(history_provider),
        Box::new(news_provider),
        store,
    );
    app.dispatch(command).await
}
