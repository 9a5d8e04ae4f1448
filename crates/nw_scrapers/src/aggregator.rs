use futures::future::join_all;
use nw_core::{Article, Category, Error, NewsSource, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// What one category request settled to.
#[derive(Debug)]
pub enum CategoryFetchOutcome {
    Fetched {
        category: String,
        articles: Vec<Article>,
    },
    Failed {
        category: String,
        error: Error,
    },
}

impl CategoryFetchOutcome {
    pub fn category(&self) -> &str {
        match self {
            CategoryFetchOutcome::Fetched { category, .. } => category,
            CategoryFetchOutcome::Failed { category, .. } => category,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, CategoryFetchOutcome::Fetched { .. })
    }

    /// The category's articles; a failure contributes none.
    pub fn into_articles(self) -> Vec<Article> {
        match self {
            CategoryFetchOutcome::Fetched { articles, .. } => articles,
            CategoryFetchOutcome::Failed { .. } => Vec::new(),
        }
    }
}

/// Issues every category request at once and waits for all of them to settle.
/// Outcomes come back in request order regardless of completion order.
async fn fan_out(source: &dyn NewsSource, country: &str, categories: &[String]) -> Vec<CategoryFetchOutcome> {
    let requests = categories.iter().map(|category| async move {
        let category = category.clone();
        match source.top_headlines(country, &category).await {
            Ok(items) => match category.parse::<Category>() {
                Ok(parsed) => CategoryFetchOutcome::Fetched {
                    articles: items.into_iter().map(|item| item.into_article(parsed)).collect(),
                    category,
                },
                Err(error) => CategoryFetchOutcome::Failed { category, error },
            },
            Err(error) => CategoryFetchOutcome::Failed { category, error },
        }
    });

    join_all(requests).await
}

fn require_credentials(source: &dyn NewsSource) -> Result<()> {
    if source.has_credentials() {
        Ok(())
    } else {
        Err(Error::MissingCredentials(format!("{} API key", source.name())))
    }
}

/// Logs every failed outcome and flattens the rest, keeping request order.
fn flatten_outcomes(outcomes: Vec<CategoryFetchOutcome>) -> Vec<Article> {
    outcomes
        .into_iter()
        .flat_map(|outcome| {
            if let CategoryFetchOutcome::Failed { category, error } = &outcome {
                match error {
                    Error::InvalidCategory(_) => {
                        warn!("Dropping articles for unknown category {}", category)
                    }
                    _ => warn!("Error fetching category {}: {}", category, error),
                }
            }
            outcome.into_articles()
        })
        .collect()
}

/// Fetches every known category from one region and merges the results.
pub struct CategoryAggregator {
    source: Arc<dyn NewsSource>,
    country: String,
    categories: Vec<String>,
}

impl CategoryAggregator {
    pub fn new(source: Arc<dyn NewsSource>, country: impl Into<String>) -> Self {
        Self {
            source,
            country: country.into(),
            categories: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
        }
    }

    /// Settled outcome per category. Fails only when the source has no credentials,
    /// in which case nothing is requested.
    pub async fn fetch_outcomes(&self) -> Result<Vec<CategoryFetchOutcome>> {
        require_credentials(self.source.as_ref())?;
        Ok(fan_out(self.source.as_ref(), &self.country, &self.categories).await)
    }

    pub async fn aggregate(&self) -> Result<Vec<Article>> {
        let outcomes = self.fetch_outcomes().await?;
        let fetched = outcomes.iter().filter(|o| o.is_fetched()).count();
        let articles = flatten_outcomes(outcomes);
        info!(
            "📰 Aggregated {} articles from {}/{} categories ({})",
            articles.len(),
            fetched,
            self.categories.len(),
            self.country
        );
        Ok(articles)
    }
}

/// Fetches the caller's own category list from the personalized region.
pub struct PersonalizedFeedAggregator {
    source: Arc<dyn NewsSource>,
    country: String,
}

impl PersonalizedFeedAggregator {
    pub fn new(source: Arc<dyn NewsSource>, country: impl Into<String>) -> Self {
        Self {
            source,
            country: country.into(),
        }
    }

    /// Splits a comma separated preference list. Entries are not checked against
    /// the known categories.
    pub fn parse_preferences(raw: Option<&str>) -> Result<Vec<String>> {
        let preferences: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if preferences.is_empty() {
            return Err(Error::MissingParameter("preferences".to_string()));
        }
        Ok(preferences)
    }

    pub async fn fetch_outcomes(&self, preferences: &[String]) -> Result<Vec<CategoryFetchOutcome>> {
        if preferences.is_empty() {
            return Err(Error::MissingParameter("preferences".to_string()));
        }
        require_credentials(self.source.as_ref())?;
        Ok(fan_out(self.source.as_ref(), &self.country, preferences).await)
    }

    pub async fn aggregate(&self, preferences: &[String]) -> Result<Vec<Article>> {
        let outcomes = self.fetch_outcomes(preferences).await?;
        let settled = outcomes.len();
        let fetched = outcomes.iter().filter(|o| o.is_fetched()).count();
        let articles = flatten_outcomes(outcomes);
        info!(
            "📰 Personalized feed: {} articles, {} of {} preferences settled successfully",
            articles.len(),
            fetched,
            settled
        );
        Ok(articles)
    }
}
