use nw_core::{Config, Error, Result, Summarizer};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub mod dummy;
pub mod gemini;

use dummy::DummyModel;
use gemini::GeminiModel;

/// Sampling parameters sent with every summarization request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 500,
        }
    }
}

/// The instruction wrapped around the cleaned article text.
pub fn summary_prompt(text: &str) -> String {
    format!("Summarize the following article in one paragraph:\n\n\"{}\"", text)
}

pub fn available_models() -> &'static [&'static str] {
    &["gemini", "dummy"]
}

pub fn create_model(name: &str, config: &Config) -> Result<Arc<dyn Summarizer>> {
    let model: Arc<dyn Summarizer> = match name.to_ascii_lowercase().as_str() {
        "gemini" => Arc::new(GeminiModel::from_config(config)?),
        "dummy" => Arc::new(DummyModel::new()),
        other => {
            return Err(Error::Config(format!(
                "Unknown model '{}'. Available models: {}",
                other,
                available_models().join(", ")
            )))
        }
    };
    info!("🧠 Summarizer initialized (using {})", model.name());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_wire_shape() {
        let value = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(value["maxOutputTokens"], 500);
        assert_eq!(value["topK"], 1);
        assert!((value["temperature"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_prompt_wraps_text() {
        let prompt = summary_prompt("Hello world");
        assert!(prompt.starts_with("Summarize the following article in one paragraph:"));
        assert!(prompt.ends_with("\"Hello world\""));
    }

    #[test]
    fn test_create_model() {
        let config = Config::default();
        assert_eq!(create_model("dummy", &config).unwrap().name(), "Dummy");
        // a missing key degrades summaries instead of failing startup
        assert_eq!(create_model("gemini", &config).unwrap().name(), "Gemini");
        assert!(create_model("gemini", &config.clone().with_gemini_api_key("k")).is_ok());
        assert!(create_model("gpt", &config).is_err());
    }
}
