use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use url::Url;

use super::models::{Article, ArticleRecord, ArticleSummary, SummaryRecord};
use crate::config::AppConfig;
use crate::{Error, Result};

/// Where summaries and article bodies come from.
///
/// The HTTP API is the only production source; tests substitute their own.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_summaries(&self) -> Result<Vec<ArticleSummary>>;

    /// Fetch a single article body by id.
    /// A missing id is `Error::ArticleNotFound`, distinct from transport failures.
    async fn fetch_article(&self, id: &str) -> Result<Article>;
}

/// Article source backed by the blog's HTTP API
pub struct HttpArticleSource {
    client: Client,
    base_url: String,
}

impl HttpArticleSource {
    pub fn new(config: &AppConfig) -> Result<Self> {
        // Validate the configured base up front so a typo fails at startup,
        // not on the first fetch
        Url::parse(&config.api.base_url)?;

        let client = Self::build_client(config.api.request_timeout_secs)?;
        let base_url = config.api.base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    fn build_client(timeout_secs: u64) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(Error::Http)
    }

    fn articles_url(&self) -> String {
        format!("{}/articles", self.base_url)
    }

    fn article_url(&self, id: &str) -> String {
        format!("{}/articles/{}", self.base_url, id)
    }
}

#[async_trait]
impl ArticleSource for HttpArticleSource {
    async fn fetch_summaries(&self) -> Result<Vec<ArticleSummary>> {
        let url = self.articles_url();
        tracing::debug!("Fetching article summaries from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("HTTP {} for URL: {}", status, url)));
        }

        let body = response.bytes().await?;
        let records: Vec<SummaryRecord> = serde_json::from_slice(&body)?;

        records
            .into_iter()
            .map(SummaryRecord::into_summary)
            .collect()
    }

    async fn fetch_article(&self, id: &str) -> Result<Article> {
        let url = self.article_url(id);
        tracing::debug!("Fetching article '{}' from {}", id, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::ArticleNotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(Error::Api(format!("HTTP {} for URL: {}", status, url)));
        }

        let body = response.bytes().await?;
        let record: ArticleRecord = serde_json::from_slice(&body)?;

        record.into_article()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with_base(base: &str) -> HttpArticleSource {
        let mut config = AppConfig::default();
        config.api.base_url = base.to_string();
        HttpArticleSource::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let source = source_with_base("https://blog.example.com/api");
        assert_eq!(
            source.articles_url(),
            "https://blog.example.com/api/articles"
        );
        assert_eq!(
            source.article_url("hello-world"),
            "https://blog.example.com/api/articles/hello-world"
        );
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let source = source_with_base("https://blog.example.com/api/");
        assert_eq!(
            source.articles_url(),
            "https://blog.example.com/api/articles"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let mut config = AppConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(HttpArticleSource::new(&config).is_err());
    }
}
