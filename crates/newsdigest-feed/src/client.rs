//! HTTP client for Google News RSS search.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use newsdigest_core::{FeedSource, NewsItem};

use crate::error::FeedError;
use crate::rss;

const DEFAULT_BASE_URL: &str = "https://news.google.com";

/// Client for the Google News RSS search endpoint.
///
/// Use [`GoogleNewsClient::new`] for production or
/// [`GoogleNewsClient::with_base_url`] to point at a mock server in tests.
pub struct GoogleNewsClient {
    client: Client,
    base_url: String,
    language: String,
    country: String,
}

impl GoogleNewsClient {
    /// Creates a client pointed at `news.google.com` with the `ja`/`JP` locale.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            language: "ja".to_string(),
            country: "JP".to_string(),
        })
    }

    /// Sets the search locale (`hl`, `gl`, and `ceid` query parameters).
    #[must_use]
    pub fn with_locale(mut self, language: &str, country: &str) -> Self {
        self.language = language.to_string();
        self.country = country.to_string();
        self
    }

    /// Builds the RSS search URL for `keyword`.
    #[must_use]
    pub fn search_url(&self, keyword: &str) -> String {
        let encoded = utf8_percent_encode(keyword, NON_ALPHANUMERIC);
        format!(
            "{base}/rss/search?q={encoded}&hl={lang}&gl={country}&ceid={country}:{lang}",
            base = self.base_url,
            lang = self.language,
            country = self.country,
        )
    }

    /// Fetches and parses the search feed for one keyword.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`FeedError::Xml`] if the body is not well-formed XML.
    pub async fn search(&self, keyword: &str) -> Result<Vec<NewsItem>, FeedError> {
        let url = self.search_url(keyword);
        tracing::info!(keyword = %keyword, "fetching Google News RSS");

        let response = self.client.get(&url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let items = rss::parse_rss_feed(&body)?;
        tracing::info!(keyword = %keyword, count = items.len(), "parsed RSS items");
        Ok(items)
    }
}

impl FeedSource for GoogleNewsClient {
    type Error = FeedError;

    async fn fetch_keyword(&self, keyword: &str) -> Result<Vec<NewsItem>, FeedError> {
        self.search(keyword).await
    }
}
