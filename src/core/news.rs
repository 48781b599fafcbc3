//! News feed model and the static fallback articles.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::core::i18n::{self, Language, Text};

/// The news region shows at most this many articles.
pub const MAX_ARTICLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Article>>;
}

/// Shown when the live feed is unreachable: exactly two localized items with
/// a placeholder link target.
pub fn fallback_articles(language: Language) -> Vec<Article> {
    vec![
        Article {
            title: i18n::lookup(language, Text::FallbackNews1Title).to_string(),
            description: Some(i18n::lookup(language, Text::FallbackNews1Desc).to_string()),
            url: "#".to_string(),
        },
        Article {
            title: i18n::lookup(language, Text::FallbackNews2Title).to_string(),
            description: Some(i18n::lookup(language, Text::FallbackNews2Desc).to_string()),
            url: "#".to_string(),
        },
    ]
}
