use std::sync::{Mutex, PoisonError};

use dashmap::{DashMap, DashSet};
use tracing::debug;

use scopecrawl_core::{LongestPage, StatsReport};

use crate::stopwords::Stopwords;

pub const DEFAULT_TOP_WORDS: usize = 50;

/// Crawl-wide counters. Every field is grow-only for the life of a run.
pub struct StatsAggregator {
    primary_domain: String,
    stopwords: Stopwords,
    top_words: usize,
    unique_urls: DashSet<String>,
    longest_page: Mutex<Option<LongestPage>>,
    subdomains: DashMap<String, u64>,
    words: DashMap<String, u64>,
}

impl StatsAggregator {
    pub fn new(primary_domain: impl Into<String>, stopwords: Stopwords) -> Self {
        Self {
            primary_domain: primary_domain.into().to_ascii_lowercase(),
            stopwords,
            top_words: DEFAULT_TOP_WORDS,
            unique_urls: DashSet::new(),
            longest_page: Mutex::new(None),
            subdomains: DashMap::new(),
            words: DashMap::new(),
        }
    }

    pub fn with_top_words(mut self, top_words: usize) -> Self {
        self.top_words = top_words;
        self
    }

    /// Returns true when the URL had not been recorded before.
    pub fn record_unique_url(&self, normalized_url: &str) -> bool {
        self.unique_urls.insert(normalized_url.to_string())
    }

    /// Replaces the longest page only when `word_count` is strictly larger.
    pub fn record_page_length(&self, word_count: usize, url: &str) -> bool {
        let mut longest = self
            .longest_page
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let replace = longest
            .as_ref()
            .map(|page| word_count > page.words)
            .unwrap_or(true);
        if replace {
            debug!(url, words = word_count, "new longest page");
            *longest = Some(LongestPage {
                url: url.to_string(),
                words: word_count,
            });
        }
        replace
    }

    /// Counts `host` only if it is the primary domain or below it.
    pub fn record_subdomain(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let under_primary = host == self.primary_domain
            || host
                .strip_suffix(&self.primary_domain)
                .map(|prefix| prefix.ends_with('.'))
                .unwrap_or(false);
        if !under_primary {
            return false;
        }
        *self.subdomains.entry(host).or_insert(0) += 1;
        true
    }

    pub fn record_words<I, S>(&self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            let token = token.as_ref();
            if self.stopwords.contains(token) {
                continue;
            }
            *self.words.entry(token.to_string()).or_insert(0) += 1;
        }
    }

    pub fn unique_url_count(&self) -> usize {
        self.unique_urls.len()
    }

    pub fn word_count(&self, token: &str) -> u64 {
        self.words.get(token).map(|c| *c).unwrap_or(0)
    }

    pub fn subdomain_count(&self, host: &str) -> u64 {
        self.subdomains.get(host).map(|c| *c).unwrap_or(0)
    }

    pub fn report(&self) -> StatsReport {
        let longest_page = self
            .longest_page
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut subdomains: Vec<(String, u64)> = self
            .subdomains
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        subdomains.sort_by(|a, b| a.0.cmp(&b.0));

        let mut top_words: Vec<(String, u64)> = self
            .words
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        top_words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_words.truncate(self.top_words);

        StatsReport {
            unique_urls: self.unique_urls.len(),
            longest_page,
            subdomains,
            top_words,
            generated_at: chrono::Utc::now(),
        }
    }
}
