use serde::Deserialize;

use crate::error::CrawlError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// Hosts the crawl is restricted to. Matching is exact, never by suffix.
#[derive(Debug, Deserialize, Clone)]
pub struct ScopeConfig {
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
    /// Subdomain counts are only kept for this domain and hosts below it.
    #[serde(default = "default_primary_domain")]
    pub primary_domain: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: default_allowed_hosts(),
            primary_domain: default_primary_domain(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GateConfig {
    #[serde(default = "default_min_body_bytes")]
    pub min_body_bytes: usize,
    #[serde(default = "default_min_words")]
    pub min_words: usize,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_body_bytes: default_min_body_bytes(),
            min_words: default_min_words(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Entries appended to the built-in trap and extension tables.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FilterConfig {
    #[serde(default)]
    pub extra_trap_keywords: Vec<String>,
    #[serde(default)]
    pub extra_filter_markers: Vec<String>,
    #[serde(default)]
    pub extra_extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    #[serde(default = "default_top_words")]
    pub top_words: usize,
    /// Replaces the built-in stopword list when set.
    #[serde(default)]
    pub stopwords_file: Option<String>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_words: default_top_words(),
            stopwords_file: None,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.scope.allowed_hosts.is_empty() {
            return Err(CrawlError::Config("scope.allowed_hosts is empty".into()));
        }
        if self.scope.primary_domain.is_empty() {
            return Err(CrawlError::Config("scope.primary_domain is empty".into()));
        }
        if self.gate.max_body_bytes < self.gate.min_body_bytes {
            return Err(CrawlError::Config(format!(
                "gate.max_body_bytes ({}) is below gate.min_body_bytes ({})",
                self.gate.max_body_bytes, self.gate.min_body_bytes
            )));
        }
        if self.general.workers == 0 {
            return Err(CrawlError::Config("general.workers must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_workers() -> usize { 8 }
fn default_allowed_hosts() -> Vec<String> {
    ["ics.uci.edu", "cs.uci.edu", "informatics.uci.edu", "stat.uci.edu"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}
fn default_primary_domain() -> String { "ics.uci.edu".to_string() }
fn default_min_body_bytes() -> usize { 500 }
fn default_min_words() -> usize { 50 }
fn default_max_body_bytes() -> usize { 5 * 1024 * 1024 }
fn default_top_words() -> usize { 50 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scope.allowed_hosts.len(), 4);
        assert_eq!(config.stats.top_words, 50);
    }

    #[test]
    fn test_inverted_size_bounds_rejected() {
        let mut config = AppConfig::default();
        config.gate.max_body_bytes = 10;
        config.gate.min_body_bytes = 100;
        assert!(matches!(config.validate(), Err(CrawlError::Config(_))));
    }
}
