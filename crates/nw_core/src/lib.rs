pub mod config;
pub mod error;
pub mod models;
pub mod sources;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use models::Summarizer;
pub use sources::{ArticleExtractor, NewsSource};
pub use storage::{ArticleStorage, InsertFailure, InsertReport};
pub use types::{
    Article, Category, ExtractedArticle, ScrapeResult, ScrapedArticle, SourceArticle,
    SummarizationFailed, Summary, SUMMARY_FALLBACK, UNTITLED,
};
