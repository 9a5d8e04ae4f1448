pub mod aggregator;
pub mod cleaner;
pub mod extractor;
pub mod jsonld;
pub mod persistence;
pub mod pipeline;
pub mod sources;

pub use aggregator::{CategoryAggregator, CategoryFetchOutcome, PersonalizedFeedAggregator};
pub use cleaner::ArticleCleaner;
pub use extractor::HtmlExtractor;
pub use persistence::persist_articles;
pub use pipeline::SummarizationPipeline;
pub use sources::newsapi::NewsApiSource;

pub mod prelude {
    pub use super::aggregator::{CategoryAggregator, PersonalizedFeedAggregator};
    pub use super::pipeline::SummarizationPipeline;
    pub use nw_core::{Article, Category, Error, Result, ScrapeResult};
}
