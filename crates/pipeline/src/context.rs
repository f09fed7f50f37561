use tracing::info;

use scopecrawl_core::config::GateConfig;
use scopecrawl_core::{AppConfig, CrawlError};
use scopecrawl_filter::LinkFilter;
use scopecrawl_stats::{DuplicateDetector, StatsAggregator, Stopwords};

/// Everything the page gate reads or mutates across pages. Built once by
/// the crawl engine and shared by reference (usually behind an `Arc`).
pub struct CrawlContext {
    pub gate: GateConfig,
    pub filter: LinkFilter,
    pub detector: DuplicateDetector,
    pub stats: StatsAggregator,
}

impl CrawlContext {
    pub fn new(config: &AppConfig, stopwords: Stopwords) -> Self {
        Self {
            gate: config.gate.clone(),
            filter: LinkFilter::from_config(config),
            detector: DuplicateDetector::new(),
            stats: StatsAggregator::new(config.scope.primary_domain.clone(), stopwords)
                .with_top_words(config.stats.top_words),
        }
    }

    /// Validates `config` and loads the configured stopword list.
    pub fn from_config(config: &AppConfig) -> Result<Self, CrawlError> {
        config.validate()?;
        let stopwords = match &config.stats.stopwords_file {
            Some(path) => {
                let stopwords = Stopwords::from_file(path)?;
                info!(path = %path, count = stopwords.len(), "loaded stopwords");
                stopwords
            }
            None => Stopwords::builtin(),
        };
        Ok(Self::new(config, stopwords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_rejects_bad_config() {
        let mut config = AppConfig::default();
        config.scope.allowed_hosts.clear();
        assert!(CrawlContext::from_config(&config).is_err());
    }

    #[test]
    fn test_missing_stopwords_file_is_error() {
        let mut config = AppConfig::default();
        config.stats.stopwords_file = Some("/no/such/file".into());
        assert!(matches!(
            CrawlContext::from_config(&config),
            Err(CrawlError::Io { .. })
        ));
    }
}
