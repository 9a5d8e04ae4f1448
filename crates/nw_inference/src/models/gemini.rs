use async_trait::async_trait;
use nw_core::{Config, Error, Result, Summarizer};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use super::{summary_prompt, GenerationConfig};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn into_text(self) -> Result<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::Summarization("No candidates in response.".to_string()))?;

        candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| Error::Summarization("No content parts in response.".to_string()))
    }
}

/// Without an API key every call fails as a summarization error, so callers
/// fall back instead of the process refusing to start.
pub struct GeminiModel {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    generation: GenerationConfig,
}

impl GeminiModel {
    pub fn new(client: Client, api_key: Option<String>, model: &str) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.trim_start_matches("models/").to_string(),
            base_url: BASE_URL.to_string(),
            generation: GenerationConfig::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let model = Self::new(config.http_client()?, config.gemini_api_key.clone(), &config.gemini_model);
        if !model.has_credentials() {
            warn!("⚠️ GEMINI_API_KEY is not configured, every summary will fall back");
        }
        Ok(model)
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(&self, text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: summary_prompt(text),
                }],
            }],
            generation_config: self.generation.clone(),
        }
    }
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Summarizer for GeminiModel {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Summarization("GEMINI_API_KEY is not configured".to_string()))?;
        debug!("Sending {} chars to {}", text.len(), self.model);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Summarization(format!(
                "Gemini returned status {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response.json::<GenerateContentResponse>().await?.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, Router};

    fn model() -> GeminiModel {
        GeminiModel::new(Client::new(), Some("test-key".to_string()), "models/gemini-1.5-flash")
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(model().request_body("Hello world")).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Hello world"));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 500);
    }

    #[test]
    fn test_endpoint_strips_models_prefix() {
        let model = model().with_base_url("http://localhost:9999/v1beta/");
        assert_eq!(
            model.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        assert!(!format!("{:?}", model()).contains("test-key"));
    }

    #[test]
    fn test_response_text_extraction() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "A short summary."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "A short summary.");
    }

    #[test]
    fn test_response_without_candidates_is_an_error() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(response.into_text(), Err(Error::Summarization(_))));

        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(response.into_text(), Err(Error::Summarization(_))));
    }

    #[test]
    fn test_response_without_parts_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert!(matches!(response.into_text(), Err(Error::Summarization(_))));

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(matches!(response.into_text(), Err(Error::Summarization(_))));
    }

    async fn serve_once(status: StatusCode, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(move || async move { (status, body) });
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/v1beta", addr)
    }

    #[tokio::test]
    async fn test_summarize_over_http() {
        let base = serve_once(
            StatusCode::OK,
            r#"{"candidates": [{"content": {"parts": [{"text": "A short summary."}]}}]}"#,
        )
        .await;
        let model = model().with_base_url(base);
        assert_eq!(model.summarize("Hello world").await.unwrap(), "A short summary.");
    }

    #[tokio::test]
    async fn test_summarize_zero_candidates_over_http() {
        let base = serve_once(StatusCode::OK, r#"{"candidates": []}"#).await;
        let err = model().with_base_url(base).summarize("Hello world").await.unwrap_err();
        assert!(matches!(err, Error::Summarization(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_a_summarization_error() {
        let base = serve_once(StatusCode::TOO_MANY_REQUESTS, r#"{"error": {"message": "quota"}}"#).await;
        let err = model().with_base_url(base).summarize("Hello world").await.unwrap_err();
        match err {
            Error::Summarization(message) => {
                assert!(message.contains("429"));
                assert!(message.contains("quota"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_calling_out() {
        let model = GeminiModel::new(Client::new(), None, "gemini-1.5-flash").with_base_url("http://127.0.0.1:9");
        assert!(!model.has_credentials());
        let err = model.summarize("Hello world").await.unwrap_err();
        match err {
            Error::Summarization(message) => assert!(message.contains("GEMINI_API_KEY")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_keyless_config_still_builds() {
        let model = GeminiModel::from_config(&Config::default()).unwrap();
        assert!(!model.has_credentials());
        let model = GeminiModel::from_config(&Config::default().with_gemini_api_key("k")).unwrap();
        assert!(model.has_credentials());
    }
}
