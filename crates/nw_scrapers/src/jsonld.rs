use scraper::{Html, Selector};
use serde_json::Value;

/// Article fields published as schema.org JSON-LD.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JsonLdArticle {
    pub headline: Option<String>,
    pub article_body: Option<String>,
}

const ARTICLE_TYPES: &[&str] = &["Article", "NewsArticle", "ReportageNewsArticle", "BlogPosting"];

fn is_article(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => ARTICLE_TYPES.contains(&t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(|t| t.as_str())
            .any(|t| ARTICLE_TYPES.contains(&t)),
        _ => false,
    }
}

fn non_empty(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Flattens top-level arrays and `@graph` containers into candidate nodes.
fn collect_nodes<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_nodes(item, out)),
        Value::Object(obj) => {
            if let Some(graph) = obj.get("@graph") {
                collect_nodes(graph, out);
            }
            out.push(value);
        }
        _ => {}
    }
}

/// Extracts the first article-typed JSON-LD block of the document.
pub fn extract_article(document: &Html) -> JsonLdArticle {
    let Ok(script_selector) = Selector::parse("script[type='application/ld+json']") else {
        return JsonLdArticle::default();
    };

    for script in document.select(&script_selector) {
        let raw = script.text().collect::<String>();
        let Ok(json) = serde_json::from_str::<Value>(raw.trim()) else {
            continue;
        };

        let mut nodes = Vec::new();
        collect_nodes(&json, &mut nodes);

        if let Some(node) = nodes.into_iter().find(|n| is_article(n)) {
            return JsonLdArticle {
                headline: non_empty(node, "headline").or_else(|| non_empty(node, "name")),
                article_body: non_empty(node, "articleBody"),
            };
        }
    }

    JsonLdArticle::default()
}
