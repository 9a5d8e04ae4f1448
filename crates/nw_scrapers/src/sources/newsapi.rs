use async_trait::async_trait;
use nw_core::{Config, Error, NewsSource, Result, SourceArticle};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Body of a NewsAPI `top-headlines` response, success or error.
#[derive(Debug, Deserialize)]
struct TopHeadlinesResponse {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<SourceArticle>,
}

impl TopHeadlinesResponse {
    fn into_articles(self) -> Result<Vec<SourceArticle>> {
        if self.status.as_deref() == Some("error") {
            return Err(Error::Source(format!(
                "{}: {}",
                self.code.unwrap_or_else(|| "error".to_string()),
                self.message.unwrap_or_default()
            )));
        }
        Ok(self.articles)
    }
}

pub struct NewsApiSource {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsApiSource {
    pub fn new(client: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.http_client()?,
            config.news_api_key.clone(),
            config.news_api_url.clone(),
        ))
    }
}

impl fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn top_headlines(&self, country: &str, category: &str) -> Result<Vec<SourceArticle>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::MissingCredentials("NEWS_API_KEY".to_string()))?;

        debug!("Fetching top headlines country={} category={}", country, category);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("country", country), ("category", category), ("apiKey", api_key)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<TopHeadlinesResponse>(&body);

        if !status.is_success() {
            let detail = parsed
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(Error::Source(format!(
                "{} returned status {}: {}",
                self.name(),
                status,
                detail
            )));
        }

        parsed?.into_articles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, Router};

    #[test]
    fn test_decode_success_body() {
        let body = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"source": {"id": null, "name": "Wire"}, "title": "First", "content": "Body one", "url": "https://example.com/1", "urlToImage": "https://example.com/1.jpg"},
                {"title": "Second", "content": null, "url": "https://example.com/2", "urlToImage": null}
            ]
        }"#;
        let response: TopHeadlinesResponse = serde_json::from_str(body).unwrap();
        let articles = response.into_articles().unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("First"));
        assert_eq!(articles[0].url_to_image.as_deref(), Some("https://example.com/1.jpg"));
        assert_eq!(articles[1].content, None);
    }

    #[test]
    fn test_decode_error_body() {
        let body = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        let response: TopHeadlinesResponse = serde_json::from_str(body).unwrap();
        let err = response.into_articles().unwrap_err();
        assert!(err.to_string().contains("apiKeyInvalid"));
    }

    #[test]
    fn test_credentials() {
        let source = NewsApiSource::new(Client::new(), None, "http://localhost");
        assert!(!source.has_credentials());

        let source = NewsApiSource::new(Client::new(), Some("  ".to_string()), "http://localhost");
        assert!(!source.has_credentials());

        let source = NewsApiSource::new(Client::new(), Some("key".to_string()), "http://localhost");
        assert!(source.has_credentials());
        assert!(format!("{:?}", source).contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_calling_out() {
        // unroutable base url: reaching the network would be a different error
        let source = NewsApiSource::new(Client::new(), None, "http://127.0.0.1:9");
        let err = source.top_headlines("us", "sports").await.unwrap_err();
        assert!(matches!(err, Error::MissingCredentials(_)));
    }

    async fn serve_once(status: StatusCode, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(move || async move { (status, body) });
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/v2/top-headlines", addr)
    }

    fn keyed(base_url: String) -> NewsApiSource {
        NewsApiSource::new(Client::new(), Some("key".to_string()), base_url)
    }

    #[tokio::test]
    async fn test_top_headlines_over_http() {
        let base = serve_once(
            StatusCode::OK,
            r#"{"status": "ok", "articles": [{"title": "First", "url": "https://example.com/1"}]}"#,
        )
        .await;
        let articles = keyed(base).top_headlines("us", "sports").await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title.as_deref(), Some("First"));
    }

    #[tokio::test]
    async fn test_error_status_is_a_source_error() {
        let base = serve_once(
            StatusCode::UNAUTHORIZED,
            r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#,
        )
        .await;
        let err = keyed(base).top_headlines("us", "sports").await.unwrap_err();
        match err {
            Error::Source(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("Your API key is invalid."));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_with_plain_body() {
        let base = serve_once(StatusCode::BAD_GATEWAY, "upstream unavailable").await;
        let err = keyed(base).top_headlines("us", "sports").await.unwrap_err();
        assert!(matches!(&err, Error::Source(m) if m.contains("upstream unavailable")));
    }
}
