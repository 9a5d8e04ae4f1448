use nw_core::{ArticleExtractor, ArticleStorage, Config, NewsSource, Result, Summarizer};
use nw_scrapers::{
    ArticleCleaner, CategoryAggregator, HtmlExtractor, NewsApiSource, PersonalizedFeedAggregator,
    SummarizationPipeline,
};
use std::sync::Arc;

/// Everything a handler needs, wired once at startup.
pub struct AppState {
    pub news: CategoryAggregator,
    pub personalized: PersonalizedFeedAggregator,
    pub pipeline: SummarizationPipeline,
    pub storage: Arc<dyn ArticleStorage>,
}

impl AppState {
    /// Wires the aggregators and the pipeline around explicit collaborators.
    pub fn new(
        config: &Config,
        source: Arc<dyn NewsSource>,
        extractor: Arc<dyn ArticleExtractor>,
        summarizer: Arc<dyn Summarizer>,
        storage: Arc<dyn ArticleStorage>,
    ) -> Self {
        Self {
            news: CategoryAggregator::new(source.clone(), config.news_country.clone()),
            personalized: PersonalizedFeedAggregator::new(source, config.personalized_country.clone()),
            pipeline: SummarizationPipeline::new(
                extractor,
                summarizer,
                ArticleCleaner::new(config.max_article_chars),
            ),
            storage,
        }
    }

    /// Production wiring: NewsAPI, HTTP page extraction and the named summarizer.
    pub fn from_config(config: &Config, model: &str, storage: Arc<dyn ArticleStorage>) -> Result<Self> {
        let source = Arc::new(NewsApiSource::from_config(config)?);
        let extractor = Arc::new(HtmlExtractor::from_config(config)?);
        let summarizer = nw_inference::create_model(model, config)?;
        Ok(Self::new(config, source, extractor, summarizer, storage))
    }
}
