//! The view controller: owns the application state and maps each command to
//! a state transition plus a re-render of the affected output regions.

use anyhow::Result;
use comfy_table::Cell;
use futures::join;
use std::time::Duration;
use tracing::{debug, warn};

use crate::AppCommand;
use crate::cli::chart;
use crate::cli::ui::{self, StyleType};
use crate::core::flags;
use crate::core::history::HistoryProvider;
use crate::core::i18n::{self, Language, Text};
use crate::core::news::{self, Article, NewsProvider};
use crate::core::rates::{
    self, BASE_CURRENCY, ConversionRecord, RateFetch, RateProvider, RateSnapshot, RateStatus,
};
use crate::core::theme::Theme;
use crate::store::PrefStore;

/// Pause between the first render and the historical load on the dashboard,
/// keeping the chart fetch out of the way of the startup requests.
const CHART_DELAY: Duration = Duration::from_millis(1000);

const DEFAULT_PAIR: (&str, &str) = ("USD", "EUR");

/// Mutable state behind every transition. Persisted fields are written back
/// through the store as an explicit side effect after each mutation.
pub struct AppState {
    pub rates: Option<RateSnapshot>,
    pub favorites: Vec<String>,
    pub theme: Theme,
    pub language: Language,
    pub selected: (String, String),
    pub last: Option<ConversionRecord>,
}

fn default_pair(favorites: &[String]) -> (String, String) {
    let from = favorites
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_PAIR.0.to_string());
    let to = favorites
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_PAIR.1.to_string());
    (from, to)
}

pub struct App {
    rate_provider: Box<dyn RateProvider>,
    history_provider: Box<dyn HistoryProvider>,
    news_provider: Box<dyn NewsProvider>,
    store: PrefStore,
    state: AppState,
}

impl App {
    pub fn new(
        rate_provider: Box<dyn RateProvider>,
        history_provider: Box<dyn HistoryProvider>,
        news_provider: Box<dyn NewsProvider>,
        store: PrefStore,
    ) -> Self {
        // Preferences apply before any network activity.
        let theme = store.theme();
        let language = store.language();
        let favorites = store.favorites();
        let last = store.last_conversion();
        let selected = last
            .as_ref()
            .map(|r| (r.from.clone(), r.to.clone()))
            .unwrap_or_else(|| default_pair(&favorites));

        App {
            rate_provider,
            history_provider,
            news_provider,
            store,
            state: AppState {
                rates: None,
                favorites,
                theme,
                language,
                selected,
                last,
            },
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn dispatch(&mut self, command: AppCommand) -> Result<()> {
        match command {
            AppCommand::Dashboard => self.dashboard().await,
            AppCommand::Convert { amount, from, to } => self.convert(amount, from, to).await,
            AppCommand::Swap => self.swap().await,
            AppCommand::Rates => self.rates_table().await,
            AppCommand::Chart { from, to } => self.chart(from, to).await,
            AppCommand::News => self.news().await,
            AppCommand::FavToggle { code } => {
                self.toggle_favorite(&code);
                Ok(())
            }
            AppCommand::FavAdd { code } => {
                self.add_favorite(&code);
                Ok(())
            }
            AppCommand::FavRemove { code } => {
                self.remove_favorite(&code);
                Ok(())
            }
            AppCommand::FavList => {
                self.render_favorites();
                Ok(())
            }
            AppCommand::FavUse { code } => self.use_favorite(&code).await,
            AppCommand::Theme { theme } => {
                self.set_theme(theme);
                Ok(())
            }
            AppCommand::Language { code } => {
                self.set_language(code.as_deref());
                Ok(())
            }
        }
    }

    fn text(&self, key: Text) -> &'static str {
        i18n::lookup(self.state.language, key)
    }

    /// Installs a fetch outcome as the current snapshot. Any failure falls
    /// back to the fixed offline table; the page never dies on a feed error.
    fn install_rates(&mut self, result: Result<RateFetch>) -> RateSnapshot {
        let snapshot = match result {
            Ok(fetch) => RateSnapshot::live(fetch.table, fetch.updated_at),
            Err(e) => {
                warn!("Failed to fetch exchange rates: {e:#}");
                println!(
                    "{}",
                    ui::style_text(self.text(Text::RateError), StyleType::Error, self.state.theme)
                );
                RateSnapshot::offline()
            }
        };
        self.state.rates = Some(snapshot.clone());
        snapshot
    }

    async fn rates(&mut self) -> RateSnapshot {
        if let Some(snapshot) = &self.state.rates {
            return snapshot.clone();
        }
        let result = self.rate_provider.fetch().await;
        self.install_rates(result)
    }

    // amount edited / currency changed / convert pressed
    pub async fn convert(
        &mut self,
        amount: Option<f64>,
        from: Option<String>,
        to: Option<String>,
    ) -> Result<()> {
        let amount = amount.or_else(|| self.state.last.as_ref().map(|r| r.amount));
        let from = from
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| self.state.selected.0.clone());
        let to = to
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| self.state.selected.1.clone());

        let Some(amount) = amount else {
            // Nothing to compute: re-display the prior result unchanged.
            self.show_last();
            return Ok(());
        };

        let snapshot = self.rates().await;
        match rates::convert(amount, &from, &to, &snapshot.table) {
            Some(record) => {
                self.state.selected = (from, to);
                self.render_conversion(&record, &snapshot);
                self.store.set_last_conversion(&record);
                self.state.last = Some(record);
                self.refresh_chart().await;
            }
            None => {
                debug!("Unknown currency in pair {from}/{to}; keeping previous result");
                self.show_last();
            }
        }
        Ok(())
    }

    pub async fn swap(&mut self) -> Result<()> {
        let (from, to) = self.state.selected.clone();
        let amount = self.state.last.as_ref().map(|r| r.amount);
        self.convert(amount, Some(to), Some(from)).await
    }

    pub async fn rates_table(&mut self) -> Result<()> {
        let snapshot = self.rates().await;

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Code"),
            ui::header_cell("Flag"),
            ui::header_cell(&format!("Rate ({BASE_CURRENCY})")),
        ]);
        for code in snapshot.table.codes() {
            if let Some(rate) = snapshot.table.get(code) {
                table.add_row(vec![
                    Cell::new(code),
                    Cell::new(flags::flag(code)),
                    Cell::new(format!("{rate:.4}"))
                        .set_alignment(comfy_table::CellAlignment::Right),
                ]);
            }
        }
        println!("{table}");
        self.render_rate_status(&snapshot);
        Ok(())
    }

    pub async fn chart(&mut self, from: Option<String>, to: Option<String>) -> Result<()> {
        let (sel_from, sel_to) = self.state.selected.clone();
        let from = from.map(|c| c.to_uppercase()).unwrap_or(sel_from);
        let to = to.map(|c| c.to_uppercase()).unwrap_or(sel_to);
        self.fetch_and_render_chart(from, to, false).await;
        Ok(())
    }

    pub async fn news(&mut self) -> Result<()> {
        let result = self.news_provider.fetch().await;
        let articles = self.news_or_fallback(result);
        self.render_news(&articles);
        Ok(())
    }

    fn news_or_fallback(&self, result: Result<Vec<Article>>) -> Vec<Article> {
        match result {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Failed to fetch news: {e:#}");
                println!(
                    "{}",
                    ui::style_text(self.text(Text::NewsError), StyleType::Error, self.state.theme)
                );
                news::fallback_articles(self.state.language)
            }
        }
    }

    // favorite toggled on a currency
    pub fn toggle_favorite(&mut self, code: &str) {
        let code = code.to_uppercase();
        if let Some(index) = self.state.favorites.iter().position(|c| *c == code) {
            self.state.favorites.remove(index);
        } else {
            self.state.favorites.push(code);
        }
        self.store.set_favorites(&self.state.favorites);
        self.render_favorites();
    }

    pub fn add_favorite(&mut self, code: &str) {
        let code = code.to_uppercase();
        if !self.state.favorites.contains(&code) {
            self.state.favorites.push(code);
            self.store.set_favorites(&self.state.favorites);
        }
        self.render_favorites();
    }

    pub fn remove_favorite(&mut self, code: &str) {
        let code = code.to_uppercase();
        self.state.favorites.retain(|c| *c != code);
        self.store.set_favorites(&self.state.favorites);
        self.render_favorites();
    }

    // favorite item clicked: the source currency becomes that favorite
    pub async fn use_favorite(&mut self, code: &str) -> Result<()> {
        let code = code.to_uppercase();
        if !self.state.favorites.contains(&code) {
            debug!("{code} is not a favorite; ignoring");
            self.render_favorites();
            return Ok(());
        }
        let amount = self.state.last.as_ref().map(|r| r.amount);
        let to = self.state.selected.1.clone();
        self.convert(amount, Some(code), Some(to)).await
    }

    pub fn set_theme(&mut self, theme: Option<Theme>) {
        let theme = theme.unwrap_or_else(|| self.state.theme.toggled());
        self.state.theme = theme;
        self.store.set_theme(theme);
        println!("{} {}", theme.icon(), theme.code());
    }

    pub fn set_language(&mut self, code: Option<&str>) {
        let Some(code) = code else {
            self.render_languages();
            return;
        };
        match Language::from_code(code) {
            Some(language) => {
                self.state.language = language;
                self.store.set_language(language);
                // Re-render the localized regions in the new language.
                println!(
                    "{}",
                    ui::style_text(self.text(Text::Title), StyleType::Title, self.state.theme)
                );
                self.show_last();
                self.render_favorites();
            }
            None => {
                println!(
                    "{}",
                    ui::style_text(
                        &format!("Unsupported language: {code}"),
                        StyleType::Error,
                        self.state.theme
                    )
                );
                self.render_languages();
            }
        }
    }

    // page load
    pub async fn dashboard(&mut self) -> Result<()> {
        println!(
            "{}",
            ui::style_text(self.text(Text::Title), StyleType::Title, self.state.theme)
        );

        let spinner = ui::new_spinner("Fetching rates and news...");
        // Startup fetches run concurrently; completion order is unimportant.
        let (rate_result, news_result) =
            join!(self.rate_provider.fetch(), self.news_provider.fetch());
        spinner.finish_and_clear();

        let snapshot = self.install_rates(rate_result);

        // Initial conversion from the restored record or the default pair.
        let amount = self.state.last.as_ref().map_or(1.0, |r| r.amount);
        let (from, to) = self.state.selected.clone();
        if let Some(record) = rates::convert(amount, &from, &to, &snapshot.table) {
            self.render_conversion(&record, &snapshot);
            self.store.set_last_conversion(&record);
            self.state.last = Some(record);
        } else {
            debug!("Restored pair {from}/{to} not in the rate table");
        }

        ui::print_separator();
        self.render_favorites();
        ui::print_separator();
        let articles = self.news_or_fallback(news_result);
        self.render_news(&articles);
        ui::print_separator();

        // The chart load trails the first render.
        tokio::time::sleep(CHART_DELAY).await;
        self.refresh_chart().await;
        Ok(())
    }

    async fn refresh_chart(&mut self) {
        let (from, to) = self.state.selected.clone();
        self.fetch_and_render_chart(from, to, true).await;
    }

    /// When `guarded`, the pair is captured at request time and a response
    /// for a selection that has since moved on is dropped instead of
    /// overwriting the current chart.
    async fn fetch_and_render_chart(&mut self, from: String, to: String, guarded: bool) {
        let issued = (from, to);
        let result = self.history_provider.fetch(&issued.0, &issued.1).await;
        if guarded && self.state.selected != issued {
            debug!(
                "Discarding stale historical response for {}/{}",
                issued.0, issued.1
            );
            return;
        }
        match result {
            Ok(series) => {
                print!(
                    "{}",
                    chart::render(&series, self.state.language, self.state.theme)
                );
            }
            Err(e) => {
                // Silent for the user: the prior chart output stays as-is.
                warn!(
                    "Failed to fetch historical rates for {}/{}: {e:#}",
                    issued.0, issued.1
                );
            }
        }
    }

    fn show_last(&self) {
        if let Some(record) = &self.state.last {
            println!(
                "{}",
                ui::style_text(&record.display_line(), StyleType::Value, self.state.theme)
            );
        }
    }

    fn render_conversion(&self, record: &ConversionRecord, snapshot: &RateSnapshot) {
        println!(
            "{} {} -> {} {}",
            flags::flag(&record.from),
            record.from,
            flags::flag(&record.to),
            record.to
        );
        println!(
            "{}",
            ui::style_text(&record.display_line(), StyleType::Value, self.state.theme)
        );
        self.render_rate_status(snapshot);
    }

    fn render_rate_status(&self, snapshot: &RateSnapshot) {
        let line = match &snapshot.status {
            RateStatus::Live { updated_at } => {
                format!(
                    "{}: {}",
                    self.text(Text::RatesUpdated),
                    updated_at.format("%Y-%m-%d")
                )
            }
            RateStatus::Offline => self.text(Text::OfflineRates).to_string(),
        };
        println!(
            "{}",
            ui::style_text(&line, StyleType::Subtle, self.state.theme)
        );
    }

    fn render_favorites(&self) {
        println!(
            "{}",
            ui::style_text(self.text(Text::Favorites), StyleType::Title, self.state.theme)
        );
        if self.state.favorites.is_empty() {
            println!("{}", ui::style_text("-", StyleType::Subtle, self.state.theme));
            return;
        }

        let mut table = ui::new_styled_table();
        for code in &self.state.favorites {
            table.add_row(vec![Cell::new(code), Cell::new(flags::flag(code))]);
        }
        println!("{table}");

        // Star state of the current selection, mirroring the toggle buttons.
        let (from, to) = &self.state.selected;
        for code in [from, to] {
            let star = if self.state.favorites.contains(code) {
                "★"
            } else {
                "☆"
            };
            println!("{star} {code}");
        }
    }

    fn render_news(&self, articles: &[Article]) {
        println!(
            "{}",
            ui::style_text(self.text(Text::News), StyleType::Title, self.state.theme)
        );
        for article in articles {
            println!(
                "{}",
                ui::style_text(&article.title, StyleType::Label, self.state.theme)
            );
            if let Some(description) = &article.description {
                println!("  {description}");
            }
            println!(
                "  {}",
                ui::style_text(&article.url, StyleType::Link, self.state.theme)
            );
        }
    }

    fn render_languages(&self) {
        println!(
            "{}:",
            ui::style_text(self.text(Text::Languages), StyleType::Label, self.state.theme)
        );
        for language in Language::ALL {
            let marker = if language == self.state.language {
                "*"
            } else {
                " "
            };
            println!("{marker} {} {}", language.code(), language.display_name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::HistoricalSeries;
    use crate::core::rates::RateTable;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use tempfile::tempdir;

    struct FixedRateProvider;

    #[async_trait]
    impl RateProvider for FixedRateProvider {
        async fn fetch(&self) -> Result<RateFetch> {
            Ok(RateFetch {
                table: RateTable::new(HashMap::from([
                    ("USD".to_string(), 1.0),
                    ("EUR".to_string(), 0.85),
                    ("GBP".to_string(), 0.73),
                ])),
                updated_at: Utc::now(),
            })
        }
    }

    struct EmptyHistoryProvider;

    #[async_trait]
    impl HistoryProvider for EmptyHistoryProvider {
        async fn fetch(&self, from: &str, to: &str) -> Result<HistoricalSeries> {
            Ok(HistoricalSeries {
                from: from.to_string(),
                to: to.to_string(),
                points: Vec::new(),
            })
        }
    }

    struct FailingNewsProvider;

    #[async_trait]
    impl NewsProvider for FailingNewsProvider {
        async fn fetch(&self) -> Result<Vec<Article>> {
            Err(anyhow!("news feed unreachable"))
        }
    }

    fn test_app(store: PrefStore) -> App {
        App::new(
            Box::new(FixedRateProvider),
            Box::new(EmptyHistoryProvider),
            Box::new(FailingNewsProvider),
            store,
        )
    }

    #[tokio::test]
    async fn test_toggle_favorite_twice_restores_list() {
        let dir = tempdir().unwrap();
        let mut app = test_app(PrefStore::open(dir.path()).unwrap());

        let before = app.state().favorites.clone();
        app.toggle_favorite("CHF");
        assert!(app.state().favorites.contains(&"CHF".to_string()));
        app.toggle_favorite("CHF");
        assert_eq!(app.state().favorites, before);
    }

    #[tokio::test]
    async fn test_convert_persists_record() {
        let dir = tempdir().unwrap();
        let mut app = test_app(PrefStore::open(dir.path()).unwrap());

        app.convert(Some(100.0), Some("USD".to_string()), Some("EUR".to_string()))
            .await
            .unwrap();

        let record = app.state().last.clone().unwrap();
        assert_eq!(format!("{:.4}", record.result), "85.0000");
        assert_eq!(app.state().selected, ("USD".to_string(), "EUR".to_string()));

        // Written through to the store as well
        drop(app);
        let store = PrefStore::open(dir.path()).unwrap();
        let persisted = store.last_conversion().unwrap();
        assert_eq!(format!("{:.4}", persisted.result), "85.0000");
    }

    #[tokio::test]
    async fn test_convert_unknown_code_keeps_previous_state() {
        let dir = tempdir().unwrap();
        let mut app = test_app(PrefStore::open(dir.path()).unwrap());

        app.convert(Some(100.0), Some("USD".to_string()), Some("EUR".to_string()))
            .await
            .unwrap();
        let before = app.state().last.clone();

        app.convert(Some(50.0), Some("USD".to_string()), Some("XXX".to_string()))
            .await
            .unwrap();
        assert_eq!(app.state().last, before);
        assert_eq!(app.state().selected, ("USD".to_string(), "EUR".to_string()));
    }

    #[tokio::test]
    async fn test_swap_twice_restores_pair_and_result() {
        let dir = tempdir().unwrap();
        let mut app = test_app(PrefStore::open(dir.path()).unwrap());

        app.convert(Some(100.0), Some("USD".to_string()), Some("EUR".to_string()))
            .await
            .unwrap();
        let original = app.state().last.clone().unwrap();

        app.swap().await.unwrap();
        assert_eq!(app.state().selected, ("EUR".to_string(), "USD".to_string()));
        let swapped = app.state().last.clone().unwrap();
        assert_eq!(format!("{:.4}", swapped.result), "117.6471");

        app.swap().await.unwrap();
        let restored = app.state().last.clone().unwrap();
        assert_eq!(app.state().selected, ("USD".to_string(), "EUR".to_string()));
        assert!((restored.result - original.result).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_use_favorite_sets_source() {
        let dir = tempdir().unwrap();
        let mut app = test_app(PrefStore::open(dir.path()).unwrap());

        app.convert(Some(10.0), Some("USD".to_string()), Some("EUR".to_string()))
            .await
            .unwrap();
        app.use_favorite("GBP").await.unwrap();

        assert_eq!(app.state().selected.0, "GBP");
        assert_eq!(app.state().selected.1, "EUR");
    }

    #[tokio::test]
    async fn test_theme_toggle_persists() {
        let dir = tempdir().unwrap();
        {
            let mut app = test_app(PrefStore::open(dir.path()).unwrap());
            assert_eq!(app.state().theme, Theme::Light);
            app.set_theme(None);
            assert_eq!(app.state().theme, Theme::Dark);
        }
        let app = test_app(PrefStore::open(dir.path()).unwrap());
        assert_eq!(app.state().theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_language_change_persists() {
        let dir = tempdir().unwrap();
        {
            let mut app = test_app(PrefStore::open(dir.path()).unwrap());
            app.set_language(Some("de"));
            assert_eq!(app.state().language, Language::De);
        }
        let app = test_app(PrefStore::open(dir.path()).unwrap());
        assert_eq!(app.state().language, Language::De);
    }

    #[tokio::test]
    async fn test_selection_restored_from_last_conversion() {
        let dir = tempdir().unwrap();
        {
            let mut app = test_app(PrefStore::open(dir.path()).unwrap());
            app.convert(Some(5.0), Some("GBP".to_string()), Some("EUR".to_string()))
                .await
                .unwrap();
        }
        let app = test_app(PrefStore::open(dir.path()).unwrap());
        assert_eq!(app.state().selected, ("GBP".to_string(), "EUR".to_string()));
        assert_eq!(app.state().last.as_ref().unwrap().amount, 5.0);
    }
}
