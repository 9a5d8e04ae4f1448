use nw_core::{
    ArticleExtractor, Error, Result, ScrapedArticle, SummarizationFailed, Summarizer, Summary, UNTITLED,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::cleaner::{truncate_chars, ArticleCleaner};

const PREVIEW_CHARS: usize = 500;

/// Extract, clean and summarize a single article URL.
///
/// Extraction and cleaning are fail-fast: without readable text there is nothing
/// to return. Summarization is fail-soft and only ever degrades the `summary`.
pub struct SummarizationPipeline {
    extractor: Arc<dyn ArticleExtractor>,
    summarizer: Arc<dyn Summarizer>,
    cleaner: ArticleCleaner,
}

impl SummarizationPipeline {
    pub fn new(
        extractor: Arc<dyn ArticleExtractor>,
        summarizer: Arc<dyn Summarizer>,
        cleaner: ArticleCleaner,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            cleaner,
        }
    }

    pub fn summarizer_name(&self) -> &str {
        self.summarizer.name()
    }

    /// Checks that `raw` is an absolute http(s) URL.
    pub fn parse_target(raw: Option<&str>) -> Result<Url> {
        let raw = raw
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::MissingParameter("url".to_string()))?;

        let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::InvalidUrl(format!("unsupported scheme '{}'", other))),
        }
    }

    pub async fn run(&self, url: &Url) -> Result<ScrapedArticle> {
        let extracted = self
            .extractor
            .extract(url.as_str())
            .await
            .map_err(|e| match e {
                Error::Extraction(_) => e,
                other => Error::Extraction(other.to_string()),
            })?
            .filter(|a| a.has_content())
            .ok_or_else(|| Error::Extraction(format!("no content at {}", url)))?;

        let markup = extracted.content.as_deref().unwrap_or_default();
        let article_body = self.cleaner.clean(markup);
        if article_body.is_empty() {
            return Err(Error::Extraction(format!("no readable text at {}", url)));
        }
        debug!("🔹 Cleaned article preview: {}", truncate_chars(&article_body, PREVIEW_CHARS));

        let summary = self.summarize(&article_body).await;

        let title = extracted
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        Ok(ScrapedArticle {
            title,
            article_body,
            summary,
        })
    }

    /// One summarizer call. Any failure becomes a `SummarizationFailed` value.
    pub async fn summarize(&self, text: &str) -> Summary {
        match self.summarizer.summarize(text).await {
            Ok(summary) => {
                info!("✅ Summary extracted ({} chars) by {}", summary.len(), self.summarizer.name());
                Ok(summary)
            }
            Err(e) => {
                warn!("❌ Error summarizing with {}: {}", self.summarizer.name(), e);
                Err(SummarizationFailed::new(e.to_string()))
            }
        }
    }
}
