use nw_core::{Result, Summarizer};
use std::fmt;

use super::GenerationConfig;

/// Offline summarizer: the leading words of the text, bounded like a real model's output.
pub struct DummyModel {
    max_words: usize,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("max_words", &self.max_words)
            .finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self {
            max_words: GenerationConfig::default().max_output_tokens as usize / 10,
        }
    }
}

#[async_trait::async_trait]
impl Summarizer for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        let words: Vec<&str> = text.split_whitespace().take(self.max_words).collect();
        Ok(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();
        let text = "This is a test article. It has multiple sentences. This is the third sentence.";

        let summary = model.summarize(text).await.unwrap();
        assert!(summary.contains("This is a test article"));

        let long = "word ".repeat(200);
        let summary = model.summarize(&long).await.unwrap();
        assert_eq!(summary.split_whitespace().count(), 50);

        // deterministic
        assert_eq!(model.summarize(text).await.unwrap(), model.summarize(text).await.unwrap());
    }
}
