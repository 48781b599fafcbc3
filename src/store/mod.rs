//! Persisted user preferences.
//!
//! One fjall partition holds every key. No validation and no schema
//! versioning: last write wins, unreadable values degrade to defaults.

use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use std::path::Path;
use tracing::debug;

use crate::core::i18n::Language;
use crate::core::rates::ConversionRecord;
use crate::core::theme::Theme;

const FAVORITES_KEY: &str = "favorites";
const THEME_KEY: &str = "theme";
const LANGUAGE_KEY: &str = "language";
const LAST_CONVERSION_KEY: &str = "lastConversion";

/// Favorites seeded on first run.
pub fn default_favorites() -> Vec<String> {
    vec![
        "USD".to_string(),
        "EUR".to_string(),
        "GBP".to_string(),
        "JPY".to_string(),
    ]
}

pub struct PrefStore {
    _keyspace: Keyspace,
    partition: PartitionHandle,
}

impl PrefStore {
    pub fn open(path: &Path) -> Result<Self> {
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open preference store at {}", path.display()))?;
        let partition = keyspace
            .open_partition("prefs", PartitionCreateOptions::default())
            .context("Failed to open preference partition")?;
        Ok(Self {
            _keyspace: keyspace,
            partition,
        })
    }

    fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        match self.partition.get(key) {
            Ok(Some(value)) => Some(value.to_vec()),
            Ok(None) => None,
            Err(e) => {
                debug!("Preference read error for {key}: {e}");
                None
            }
        }
    }

    fn put_raw(&self, key: &str, value: &[u8]) {
        if let Err(e) = self.partition.insert(key, value) {
            debug!("Preference write error for {key}: {e}");
        }
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get_raw(key).and_then(|v| String::from_utf8(v).ok())
    }

    pub fn favorites(&self) -> Vec<String> {
        self.get_raw(FAVORITES_KEY)
            .and_then(|v| serde_json::from_slice(&v).ok())
            .unwrap_or_else(default_favorites)
    }

    pub fn set_favorites(&self, favorites: &[String]) {
        match serde_json::to_vec(favorites) {
            Ok(bytes) => self.put_raw(FAVORITES_KEY, &bytes),
            Err(e) => debug!("Failed to encode favorites: {e}"),
        }
    }

    pub fn theme(&self) -> Theme {
        self.get_string(THEME_KEY)
            .and_then(|code| Theme::from_code(&code))
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.put_raw(THEME_KEY, theme.code().as_bytes());
    }

    pub fn language(&self) -> Language {
        self.get_string(LANGUAGE_KEY)
            .and_then(|code| Language::from_code(&code))
            .unwrap_or_default()
    }

    pub fn set_language(&self, language: Language) {
        self.put_raw(LANGUAGE_KEY, language.code().as_bytes());
    }

    pub fn last_conversion(&self) -> Option<ConversionRecord> {
        self.get_raw(LAST_CONVERSION_KEY)
            .and_then(|v| serde_json::from_slice(&v).ok())
    }

    pub fn set_last_conversion(&self, record: &ConversionRecord) {
        match serde_json::to_vec(record) {
            Ok(bytes) => self.put_raw(LAST_CONVERSION_KEY, &bytes),
            Err(e) => debug!("Failed to encode conversion record: {e}"),
        }
    }
}
