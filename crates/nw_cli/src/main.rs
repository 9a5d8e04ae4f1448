use anyhow::Context;
use clap::{Parser, Subcommand};
use nw_core::{ArticleStorage, Category, Config};
use nw_scrapers::{
    persist_articles, ArticleCleaner, CategoryAggregator, HtmlExtractor, NewsApiSource,
    PersonalizedFeedAggregator, SummarizationPipeline,
};
use nw_web::AppState;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage backend. Available backends: memory (default), sqlite
    #[arg(long, env = "STORAGE", default_value = "memory", global = true)]
    storage: String,
    /// Database file for the sqlite backend
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,
    #[arg(long, env = "MODEL", default_value = "gemini", global = true, help = "Summarizer to use. Available models: gemini (default), dummy")]
    model: String,
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true, global = true)]
    news_api_key: Option<String>,
    #[arg(long, env = "NEWS_API_URL", default_value = nw_core::config::DEFAULT_NEWS_API_URL, global = true)]
    news_api_url: String,
    #[arg(long, env = "NEWS_COUNTRY", default_value = "us", global = true)]
    news_country: String,
    #[arg(long, env = "PERSONALIZED_COUNTRY", default_value = "in", global = true)]
    personalized_country: String,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    gemini_api_key: Option<String>,
    #[arg(long, env = "GEMINI_MODEL", default_value = nw_core::config::DEFAULT_GEMINI_MODEL, global = true)]
    gemini_model: String,
    /// Upper bound in seconds on every outbound HTTP call
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10, global = true)]
    request_timeout_secs: u64,
    #[arg(long, env = "MAX_ARTICLE_CHARS", default_value_t = nw_core::config::DEFAULT_MAX_ARTICLE_CHARS, global = true)]
    max_article_chars: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },
    /// Aggregate every category once, persist the batch and print it
    Fetch,
    /// Aggregate a comma separated list of categories and print it
    Personalized {
        preferences: String,
    },
    /// Extract, clean and summarize a single article
    Scrape {
        url: String,
    },
    /// Print stored articles, newest first
    Stored {
        /// Only this category. All categories when omitted.
        #[arg(long)]
        category: Option<Category>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config {
            news_api_url: self.news_api_url.clone(),
            news_country: self.news_country.clone(),
            personalized_country: self.personalized_country.clone(),
            gemini_model: self.gemini_model.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_article_chars: self.max_article_chars,
            ..Config::default()
        };
        if let Some(key) = &self.news_api_key {
            config = config.with_news_api_key(key.as_str());
        }
        if let Some(key) = &self.gemini_api_key {
            config = config.with_gemini_api_key(key.as_str());
        }
        config
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutdown requested, draining connections"),
        Err(e) => warn!("⚠️ Failed to listen for ctrl-c: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging();

    let config = cli.config();
    info!("⚙️ Configuration: {:?}", config);

    let storage: Arc<dyn ArticleStorage> = nw_storage::create_storage(&cli.storage, cli.database_url.as_deref())
        .await
        .with_context(|| format!("failed to open {} storage", cli.storage))?;

    match cli.command {
        Commands::Serve { ref host, port } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("invalid bind address {}:{}", host, port))?;
            let state = AppState::from_config(&config, &cli.model, storage)
                .context("failed to initialize the API")?;
            info!("🧠 Summarizing with {}", state.pipeline.summarizer_name());
            nw_web::serve(state, addr, shutdown_signal()).await?;
        }
        Commands::Fetch => {
            let source = Arc::new(NewsApiSource::from_config(&config)?);
            let aggregator = CategoryAggregator::new(source, config.news_country.clone());
            let articles = aggregator.aggregate().await?;
            if let Some(report) = persist_articles(storage.as_ref(), &articles).await {
                info!("💾 Stored {} of {} articles", report.inserted, articles.len());
            }
            print_json(&articles)?;
        }
        Commands::Personalized { ref preferences } => {
            let preferences = PersonalizedFeedAggregator::parse_preferences(Some(preferences.as_str()))?;
            let source = Arc::new(NewsApiSource::from_config(&config)?);
            let aggregator = PersonalizedFeedAggregator::new(source, config.personalized_country.clone());
            print_json(&aggregator.aggregate(&preferences).await?)?;
        }
        Commands::Scrape { ref url } => {
            let url = SummarizationPipeline::parse_target(Some(url.as_str()))?;
            let pipeline = SummarizationPipeline::new(
                Arc::new(HtmlExtractor::from_config(&config)?),
                nw_inference::create_model(&cli.model, &config)?,
                ArticleCleaner::new(config.max_article_chars),
            );
            let result: nw_core::ScrapeResult = pipeline.run(&url).await?.into();
            print_json(&result)?;
        }
        Commands::Stored { category, limit } => {
            let categories = match category {
                Some(category) => vec![category],
                None => Category::ALL.to_vec(),
            };
            let mut articles = Vec::new();
            for category in categories {
                articles.extend(storage.get_by_category(category, limit).await?);
            }
            info!("📚 {} stored articles in {}", articles.len(), storage.name());
            print_json(&articles)?;
        }
    }

    Ok(())
}
