use async_trait::async_trait;
use nw_core::{Article, ArticleStorage, Category, InsertReport, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::StorageBackend;

/// Records kept before the oldest are evicted.
pub const DEFAULT_MAX_ARTICLES: usize = 10_000;

/// Process-local store. Duplicate URLs are kept, like the document store it stands in for.
/// Bounded: once `max_articles` is exceeded the oldest records are dropped.
#[derive(Clone)]
pub struct InMemoryStorage {
    articles: Arc<RwLock<Vec<Article>>>,
    max_articles: usize,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::with_max_articles(DEFAULT_MAX_ARTICLES)
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_articles(max_articles: usize) -> Self {
        Self {
            articles: Arc::new(RwLock::new(Vec::new())),
            max_articles,
        }
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn open(_location: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert_many(&self, articles: &[Article]) -> Result<InsertReport> {
        let mut report = InsertReport::default();
        let mut store = self.articles.write().await;

        for (index, article) in articles.iter().enumerate() {
            match article.validate() {
                Ok(()) => {
                    store.push(article.clone());
                    report.inserted += 1;
                }
                Err(reason) => {
                    debug!("Rejected article #{} ({}): {}", index, article.url, reason);
                    report.record_failure(index, article, reason);
                }
            }
        }

        let excess = store.len().saturating_sub(self.max_articles);
        if excess > 0 {
            let kept = store.split_off(excess);
            *store = kept;
            debug!("Evicted {} oldest articles (cap {})", excess, self.max_articles);
        }

        Ok(report)
    }

    async fn get_by_category(&self, category: Category, limit: usize) -> Result<Vec<Article>> {
        let store = self.articles.read().await;
        let mut articles: Vec<Article> = store
            .iter()
            .rev()
            .filter(|a| a.category == category)
            .cloned()
            .collect();
        // stable, so equal timestamps keep newest-insert-first
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        articles.truncate(limit);
        Ok(articles)
    }
}
