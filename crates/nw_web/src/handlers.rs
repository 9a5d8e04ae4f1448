use axum::{
    extract::{Query, State},
    Json,
};
use nw_core::{Article, ScrapeResult};
use nw_scrapers::{persist_articles, PersonalizedFeedAggregator, SummarizationPipeline};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{ApiError, AppState};

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct PreferencesQuery {
    pub preferences: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeQuery {
    pub url: Option<String>,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "News Aggregator API is running" }))
}

/// Aggregates every category, persists the batch and returns the full set.
/// A persistence failure is logged and never changes the response.
pub async fn news(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Article>> {
    let articles = state.news.aggregate().await?;
    persist_articles(state.storage.as_ref(), &articles).await;
    Ok(Json(articles))
}

pub async fn personalized_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreferencesQuery>,
) -> ApiResult<Vec<Article>> {
    let preferences = PersonalizedFeedAggregator::parse_preferences(query.preferences.as_deref())?;
    let articles = state.personalized.aggregate(&preferences).await?;
    Ok(Json(articles))
}

pub async fn scrape(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScrapeQuery>,
) -> ApiResult<ScrapeResult> {
    let url = SummarizationPipeline::parse_target(query.url.as_deref())?;
    let scraped = state.pipeline.run(&url).await?;
    Ok(Json(scraped.into()))
}
