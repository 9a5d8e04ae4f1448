use nw_core::{Article, ArticleStorage, InsertReport};
use tracing::{error, info, warn};

/// Best-effort bulk insert. Store failures are logged and swallowed so the caller
/// can still answer with the articles it already holds.
pub async fn persist_articles(storage: &dyn ArticleStorage, articles: &[Article]) -> Option<InsertReport> {
    if articles.is_empty() {
        return None;
    }

    match storage.insert_many(articles).await {
        Ok(report) => {
            if report.is_complete() {
                info!("💾 Stored {} articles in {}", report.inserted, storage.name());
            } else {
                warn!(
                    "💾 Stored {} of {} articles in {}; {} rejected",
                    report.inserted,
                    articles.len(),
                    storage.name(),
                    report.failures.len()
                );
                for failure in &report.failures {
                    warn!("Rejected article #{} ({}): {}", failure.index, failure.url, failure.reason);
                }
            }
            Some(report)
        }
        Err(e) => {
            error!("Database insert error: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nw_core::{Category, Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FlakyStorage {
        down: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ArticleStorage for FlakyStorage {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn insert_many(&self, articles: &[Article]) -> Result<InsertReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.down {
                return Err(Error::Storage("connection refused".to_string()));
            }
            let mut report = InsertReport::default();
            for (index, article) in articles.iter().enumerate() {
                match article.validate() {
                    Ok(()) => report.inserted += 1,
                    Err(reason) => report.record_failure(index, article, reason),
                }
            }
            Ok(report)
        }

        async fn get_by_category(&self, _category: Category, _limit: usize) -> Result<Vec<Article>> {
            Ok(Vec::new())
        }
    }

    fn batch() -> Vec<Article> {
        vec![
            Article::new("Good", "", "https://example.com/1", None, Category::General),
            Article::new("Bad", "", "", None, Category::General),
        ]
    }

    #[tokio::test]
    async fn test_partial_batch_reports_failures() {
        let storage = FlakyStorage::default();
        let report = persist_articles(&storage, &batch()).await.unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_store_down_is_swallowed() {
        let storage = FlakyStorage {
            down: true,
            ..Default::default()
        };
        assert!(persist_articles(&storage, &batch()).await.is_none());
        assert_eq!(storage.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_store() {
        let storage = FlakyStorage::default();
        assert!(persist_articles(&storage, &[]).await.is_none());
        assert_eq!(storage.calls.load(Ordering::SeqCst), 0);
    }
}
