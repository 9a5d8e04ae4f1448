use std::fmt;
use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/top-headlines";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_MAX_ARTICLE_CHARS: usize = 6000;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("newswire/", env!("CARGO_PKG_VERSION"));

/// Read-only runtime settings, built once at startup and shared by every component.
#[derive(Clone)]
pub struct Config {
    pub news_api_key: Option<String>,
    pub news_api_url: String,
    /// Region for the all-categories feed.
    pub news_country: String,
    /// Region for the preference-driven feed.
    pub personalized_country: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Upper bound on every outbound HTTP call.
    pub request_timeout: Duration,
    /// Cleaned article text is cut to this many characters before summarization.
    pub max_article_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_api_key: None,
            news_api_url: DEFAULT_NEWS_API_URL.to_string(),
            news_country: "us".to_string(),
            personalized_country: "in".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_article_chars: DEFAULT_MAX_ARTICLE_CHARS,
        }
    }
}

impl Config {
    pub fn with_news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into()).filter(|k: &String| !k.trim().is_empty());
        self
    }

    pub fn with_gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into()).filter(|k: &String| !k.trim().is_empty());
        self
    }

    /// Builds the HTTP client used for provider, page and summarizer calls.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("news_api_key", &self.news_api_key.as_deref().map(|_| "<redacted>"))
            .field("news_api_url", &self.news_api_url)
            .field("news_country", &self.news_country)
            .field("personalized_country", &self.personalized_country)
            .field("gemini_api_key", &self.gemini_api_key.as_deref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("request_timeout", &self.request_timeout)
            .field("max_article_chars", &self.max_article_chars)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_keys() {
        let config = Config::default()
            .with_news_api_key("news-secret")
            .with_gemini_api_key("gemini-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("news-secret"));
        assert!(!printed.contains("gemini-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_blank_keys_count_as_missing() {
        let config = Config::default().with_news_api_key("   ");
        assert!(config.news_api_key.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_article_chars, 6000);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.news_country, "us");
        assert_eq!(config.personalized_country, "in");
        assert!(config.http_client().is_ok());
    }
}
