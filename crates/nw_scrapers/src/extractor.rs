use async_trait::async_trait;
use nw_core::{ArticleExtractor, Config, Error, ExtractedArticle, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::jsonld;

const TITLE_SELECTORS: &[&str] = &[
    "meta[property='og:title']",
    "meta[name='twitter:title']",
    "h1",
    "title",
];

/// Containers tried in order for the article body.
const BODY_SELECTORS: &[&str] = &[
    "article",
    "[itemprop='articleBody']",
    "main",
    "[role='main']",
];

/// Fetches a page over HTTP and pulls out its title and body markup.
pub struct HtmlExtractor {
    client: Client,
}

impl HtmlExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.http_client()?))
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Extraction(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Extraction(format!("{} returned status {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Extraction(format!("Failed to read body of {}: {}", url, e)))
    }
}

#[async_trait]
impl ArticleExtractor for HtmlExtractor {
    async fn extract(&self, url: &str) -> Result<Option<ExtractedArticle>> {
        let html = self.fetch_html(url).await?;
        let article = parse_article(&html);
        debug!(
            "Extracted {} from {}",
            if article.is_some() { "an article" } else { "nothing" },
            url
        );
        Ok(article)
    }
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn first_title(document: &Html) -> Option<String> {
    TITLE_SELECTORS.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document.select(&selector).find_map(|el| {
            let text = match el.value().attr("content") {
                Some(content) => content.trim().to_string(),
                None => element_text(&el),
            };
            Some(text).filter(|t| !t.is_empty())
        })
    })
}

fn body_container(document: &Html) -> Option<String> {
    BODY_SELECTORS.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document
            .select(&selector)
            .find(|el| !element_text(el).is_empty())
            .map(|el| el.inner_html())
    })
}

fn paragraphs(document: &Html) -> Option<String> {
    let selector = Selector::parse("p").ok()?;
    let found: Vec<String> = document
        .select(&selector)
        .filter(|el| !element_text(el).is_empty())
        .map(|el| el.html())
        .collect();
    (!found.is_empty()).then(|| found.join("\n"))
}

/// Parses a full HTML document. `None` when no article body can be found.
pub fn parse_article(html: &str) -> Option<ExtractedArticle> {
    let document = Html::parse_document(html);
    let structured = jsonld::extract_article(&document);

    let content = body_container(&document)
        .or_else(|| paragraphs(&document))
        .or(structured.article_body)?;

    Some(ExtractedArticle {
        title: first_title(&document).or(structured.headline),
        content: Some(content),
    })
}
