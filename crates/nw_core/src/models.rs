use async_trait::async_trait;
use std::fmt;

use crate::Result;

#[async_trait]
pub trait Summarizer: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Summarize cleaned article text in one paragraph
    async fn summarize(&self, text: &str) -> Result<String>;
}
