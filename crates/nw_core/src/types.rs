use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Text rendered in place of a summary when the summarizer gave us nothing.
pub const SUMMARY_FALLBACK: &str = "Failed to summarize";

/// Title used when the extracted page has none.
pub const UNTITLED: &str = "No title";

/// The fixed set of provider categories, in aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| crate::Error::InvalidCategory(s.to_string()))
    }
}

/// A news item as persisted and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    /// Provider snippet, not the full body.
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        image_url: Option<String>,
        category: Category,
    ) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            description: description.into(),
            url: url.into(),
            image_url,
            category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks the fields a store requires before accepting the record.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("article url is empty".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("article title is empty".to_string());
        }
        Ok(())
    }
}

/// One entry of a provider's `articles` array. Every field may be null upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
}

impl SourceArticle {
    pub fn into_article(self, category: Category) -> Article {
        Article::new(
            self.title.unwrap_or_default(),
            self.content.unwrap_or_default(),
            self.url.unwrap_or_default(),
            self.url_to_image.filter(|u| !u.trim().is_empty()),
            category,
        )
    }
}

/// Structured page content produced by an extractor. `content` is markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ExtractedArticle {
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .map_or(false, |c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct SummarizationFailed {
    pub reason: String,
}

impl SummarizationFailed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Either the generated text or the reason the summarizer fell back.
pub type Summary = std::result::Result<String, SummarizationFailed>;

/// Pipeline output before it is rendered for HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedArticle {
    pub title: String,
    pub article_body: String,
    pub summary: Summary,
}

impl ScrapedArticle {
    pub fn is_summarized(&self) -> bool {
        self.summary.is_ok()
    }
}

/// Wire shape of `GET /scrape`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub title: String,
    pub article_body: String,
    pub summary: String,
}

impl From<ScrapedArticle> for ScrapeResult {
    fn from(scraped: ScrapedArticle) -> Self {
        Self {
            title: scraped.title,
            article_body: scraped.article_body,
            summary: scraped
                .summary
                .unwrap_or_else(|_| SUMMARY_FALLBACK.to_string()),
        }
    }
}
