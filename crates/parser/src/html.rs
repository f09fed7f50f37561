use std::collections::HashSet;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use scopecrawl_filter::{normalize_parsed, resolve_link};

/// Elements whose text never shows up on the rendered page.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

pub struct HtmlResult {
    pub body_text: String,
    /// Absolute, fragment-free, first-seen order, no self-links.
    pub links: Vec<String>,
}

pub fn parse_html(html_str: &str, base_url: &Url) -> HtmlResult {
    let document = Html::parse_document(html_str);

    HtmlResult {
        body_text: extract_visible_text(&document),
        links: extract_links(&document, base_url),
    }
}

fn selector(s: &str) -> Option<Selector> {
    Selector::parse(s).ok()
}

fn extract_visible_text(document: &Html) -> String {
    let mut pieces = Vec::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .map(|el| HIDDEN_TAGS.contains(&el.name()))
                .unwrap_or(false)
        });
        if !hidden {
            pieces.push(&**text);
        }
    }
    pieces
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Some(sel) = selector("a[href]") else {
        return vec![];
    };
    let own = normalize_parsed(base_url);
    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for el in document.select(&sel) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }
        let resolved = match resolve_link(base_url, href) {
            Ok(u) => u,
            Err(e) => {
                debug!(base = %base_url, href, "unresolvable link: {}", e);
                continue;
            }
        };
        let normalized = normalize_parsed(&resolved);
        if normalized == own || !seen.insert(normalized) {
            continue;
        }
        links.push(resolved.to_string());
    }
    links
}
