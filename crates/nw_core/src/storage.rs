use async_trait::async_trait;

use crate::types::{Article, Category};
use crate::Result;

/// A single record the store refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertFailure {
    /// Position of the record in the submitted batch.
    pub index: usize,
    pub url: String,
    pub reason: String,
}

/// Outcome of an unordered, continue-on-error bulk insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted: usize,
    pub failures: Vec<InsertFailure>,
}

impl InsertReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn record_failure(&mut self, index: usize, article: &Article, reason: impl Into<String>) {
        self.failures.push(InsertFailure {
            index,
            url: article.url.clone(),
            reason: reason.into(),
        });
    }
}

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Returns the name of the backend
    fn name(&self) -> &str;

    /// Insert every well-formed article. A bad record never rejects its siblings;
    /// `Err` is reserved for the store itself being unusable.
    async fn insert_many(&self, articles: &[Article]) -> Result<InsertReport>;

    /// Most recently stored articles of a category, newest first
    async fn get_by_category(&self, category: Category, limit: usize) -> Result<Vec<Article>>;
}
