use async_trait::async_trait;

use crate::types::{ExtractedArticle, SourceArticle};
use crate::Result;

/// A remote catalog of headlines, queryable per region and category.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Returns the name of the provider
    fn name(&self) -> &str;

    /// False when the provider cannot be called at all (no API key).
    fn has_credentials(&self) -> bool;

    /// Fetches one page of headlines. `category` is passed through verbatim.
    async fn top_headlines(&self, country: &str, category: &str) -> Result<Vec<SourceArticle>>;
}

/// Turns a page URL into structured article content.
#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    /// `Ok(None)` means the page was fetched but held nothing article-like.
    async fn extract(&self, url: &str) -> Result<Option<ExtractedArticle>>;
}
