use url::Url;

use scopecrawl_core::CrawlError;

/// Canonical string form used for URL equality: fragment dropped and
/// trailing path slashes stripped. Scheme, authority and query are kept.
pub fn normalize_url(url: &str) -> Result<String, CrawlError> {
    let parsed = Url::parse(url).map_err(|e| CrawlError::InvalidUrl(format!("{url}: {e}")))?;
    Ok(normalize_parsed(&parsed))
}

/// Same as [`normalize_url`] for an already parsed URL.
pub fn normalize_parsed(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    let path = normalized.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        // "/" is the shortest path a hierarchical URL can carry
        normalized.set_path(if trimmed.is_empty() { "/" } else { &trimmed });
    }
    normalized.to_string()
}

/// Resolve `href` against `base` and drop the fragment.
pub fn resolve_link(base: &Url, href: &str) -> Result<Url, CrawlError> {
    let mut resolved = base
        .join(href)
        .map_err(|e| CrawlError::InvalidUrl(format!("{href}: {e}")))?;
    resolved.set_fragment(None);
    Ok(resolved)
}
