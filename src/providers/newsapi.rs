use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::news::{Article, MAX_ARTICLES, NewsProvider};

/// The fixed query the news region is built from.
const NEWS_QUERY: &str = "currency exchange";

/// Client for the newsapi.org everything endpoint.
pub struct NewsApiProvider {
    base_url: String,
    api_key: String,
}

impl NewsApiProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        NewsApiProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct NewsResponse {
    articles: Vec<Article>,
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    #[instrument(name = "NewsFetch", skip(self))]
    async fn fetch(&self) -> Result<Vec<Article>> {
        let url = format!("{}/v2/everything", self.base_url);
        debug!("Requesting news from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("cambio/1.0")
            .build()?;
        let response = client
            .get(&url)
            .query(&[
                ("q", NEWS_QUERY),
                ("sortBy", "publishedAt"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for news feed", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from news feed", response.status()));
        }

        let text = response.text().await?;
        let mut data: NewsResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse news response: {}", e))?;

        data.articles.truncate(MAX_ARTICLES);
        Ok(data.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_successful_news_fetch_caps_at_three() {
        let mock_response = r#"{
            "articles": [
                { "title": "One", "description": "first", "url": "https://example.com/1" },
                { "title": "Two", "description": null, "url": "https://example.com/2" },
                { "title": "Three", "url": "https://example.com/3" },
                { "title": "Four", "description": "never shown", "url": "https://example.com/4" }
            ]
        }"#;

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", NEWS_QUERY))
            .and(query_param("sortBy", "publishedAt"))
            .and(query_param("apiKey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = NewsApiProvider::new(&mock_server.uri(), "test-key");
        let articles = provider.fetch().await.unwrap();

        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title, "One");
        assert_eq!(articles[1].description, None);
        assert_eq!(articles[2].description, None);
    }

    #[tokio::test]
    async fn test_unauthorized_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let provider = NewsApiProvider::new(&mock_server.uri(), "bad-key");
        let result = provider.fetch().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 401 Unauthorized from news feed"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"items": []}"#))
            .mount(&mock_server)
            .await;

        let provider = NewsApiProvider::new(&mock_server.uri(), "test-key");
        let result = provider.fetch().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse news response")
        );
    }
}
