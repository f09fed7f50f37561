//! Crawler trap heuristics
//!
//! Three independent rules, any of which marks a URL as a trap:
//! - a trap keyword appears anywhere in the URL (calendars, feeds, archives,
//!   revision history)
//! - a `YYYY-MM` or `YYYY-MM-DD` segment appears in the URL, its decoded path
//!   or any decoded query value
//! - a query parameter is a known faceted-search / listing filter

use std::fmt;

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

pub const TRAP_KEYWORDS: &[&str] = &[
    "calendar",
    "ical=",
    "/ical",
    "outlook-ical",
    "/events/list",
    "/feed",
    "feed=",
    "archive",
    "revision",
    "do=diff",
    "do=revisions",
    "action=diff",
    "action=history",
    "oldid=",
    "replytocom",
    "share=",
    "wp-json",
    "/page/",
];

/// Query parameter names (before any `[...]` suffix) that page through or
/// facet a listing.
pub const FILTER_QUERY_MARKERS: &[&str] = &[
    "filter",
    "facet",
    "tribe-bar-date",
    "tribe_eventcategory",
    "eventdisplay",
    "orderby",
    "order",
    "sort",
    "limitstart",
    "idx",
    "rev",
];

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}(?:-\d{2})?\b").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrapRule {
    Keyword(String),
    DateSegment(String),
    FilterQuery(String),
}

impl fmt::Display for TrapRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => write!(f, "trap keyword {:?}", k),
            Self::DateSegment(d) => write!(f, "date segment {:?}", d),
            Self::FilterQuery(p) => write!(f, "filter query parameter {:?}", p),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrapFilter {
    keywords: Vec<String>,
    filter_markers: Vec<String>,
}

impl Default for TrapFilter {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>(), std::iter::empty::<&str>())
    }
}

impl TrapFilter {
    /// Built-in tables extended with `extra_keywords` and `extra_markers`.
    pub fn new<K, M, S, T>(extra_keywords: K, extra_markers: M) -> Self
    where
        K: IntoIterator<Item = S>,
        M: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let keywords = TRAP_KEYWORDS
            .iter()
            .map(|k| k.to_string())
            .chain(extra_keywords.into_iter().map(|k| k.as_ref().to_lowercase()))
            .filter(|k| !k.is_empty())
            .collect();
        let filter_markers = FILTER_QUERY_MARKERS
            .iter()
            .map(|m| m.to_string())
            .chain(extra_markers.into_iter().map(|m| m.as_ref().to_lowercase()))
            .filter(|m| !m.is_empty())
            .collect();
        Self {
            keywords,
            filter_markers,
        }
    }

    pub fn is_trap(&self, url: &str) -> bool {
        self.check(url).is_some()
    }

    /// First rule that fires for `url`, if any.
    pub fn check(&self, url: &str) -> Option<TrapRule> {
        let lower = url.to_lowercase();

        if let Some(keyword) = self.keywords.iter().find(|k| lower.contains(k.as_str())) {
            return Some(TrapRule::Keyword(keyword.clone()));
        }

        if let Some(m) = DATE_RE.find(&lower) {
            return Some(TrapRule::DateSegment(m.as_str().to_string()));
        }

        // Encoded forms only show up after decoding
        let Ok(parsed) = Url::parse(url) else {
            return None;
        };

        let path = percent_decode_str(parsed.path()).decode_utf8_lossy();
        if let Some(m) = DATE_RE.find(&path) {
            return Some(TrapRule::DateSegment(m.as_str().to_string()));
        }

        for (name, value) in parsed.query_pairs() {
            if let Some(m) = DATE_RE.find(&value) {
                return Some(TrapRule::DateSegment(m.as_str().to_string()));
            }
            let name = name.to_lowercase();
            let base = name.split('[').next().unwrap_or(&name);
            if self.filter_markers.iter().any(|m| m == base) {
                return Some(TrapRule::FilterQuery(name.clone()));
            }
        }

        None
    }
}
