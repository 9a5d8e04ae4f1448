use nw_core::config::DEFAULT_MAX_ARTICLE_CHARS;
use scraper::{Html, Node};

/// Elements whose text never belongs to the article body.
const IGNORED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Reduces extracted markup to plain, single-spaced text of bounded length.
#[derive(Debug, Clone, Copy)]
pub struct ArticleCleaner {
    max_chars: usize,
}

impl Default for ArticleCleaner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ARTICLE_CHARS)
    }
}

impl ArticleCleaner {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Strip markup, collapse whitespace runs, trim, then cut to `max_chars`.
    pub fn clean(&self, markup: &str) -> String {
        let text = collapse_whitespace(&markup_text(markup));
        truncate_chars(&text, self.max_chars).to_string()
    }
}

/// Concatenated text nodes of an HTML fragment.
pub fn markup_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut text = String::with_capacity(markup.len());

    for node in fragment.root_element().descendants() {
        if let Node::Text(t) = node.value() {
            let hidden = node
                .ancestors()
                .filter_map(|a| a.value().as_element())
                .any(|el| IGNORED_ELEMENTS.contains(&el.name()));
            if !hidden {
                text.push_str(t);
            }
        }
    }

    text
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
