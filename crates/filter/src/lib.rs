pub mod extension;
pub mod normalize;
pub mod scope;
pub mod trap;

use std::fmt;

use tracing::debug;
use url::Url;

use scopecrawl_core::AppConfig;

pub use extension::ExtensionFilter;
pub use normalize::{normalize_parsed, normalize_url, resolve_link};
pub use scope::DomainScope;
pub use trap::{TrapFilter, TrapRule};

/// Which check turned a candidate link away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRejection {
    InvalidUrl(String),
    Scheme(String),
    OutOfScope(String),
    Extension,
    Trap(TrapRule),
}

impl fmt::Display for LinkRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(e) => write!(f, "invalid URL: {}", e),
            Self::Scheme(s) => write!(f, "scheme {:?} not crawled", s),
            Self::OutOfScope(h) => write!(f, "host {:?} not in scope", h),
            Self::Extension => write!(f, "non-HTML extension"),
            Self::Trap(rule) => write!(f, "trap: {}", rule),
        }
    }
}

/// Scope, extension and trap checks applied to every outbound link.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    scope: DomainScope,
    extensions: ExtensionFilter,
    traps: TrapFilter,
}

impl LinkFilter {
    pub fn new(scope: DomainScope, extensions: ExtensionFilter, traps: TrapFilter) -> Self {
        Self {
            scope,
            extensions,
            traps,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            DomainScope::new(&config.scope.allowed_hosts),
            ExtensionFilter::new(&config.filter.extra_extensions),
            TrapFilter::new(
                &config.filter.extra_trap_keywords,
                &config.filter.extra_filter_markers,
            ),
        )
    }

    pub fn check(&self, url: &str) -> Result<(), LinkRejection> {
        let parsed = Url::parse(url).map_err(|e| LinkRejection::InvalidUrl(e.to_string()))?;

        if !DomainScope::has_web_scheme(&parsed) {
            return Err(LinkRejection::Scheme(parsed.scheme().to_string()));
        }
        if !self.scope.contains(&parsed) {
            return Err(LinkRejection::OutOfScope(
                parsed.host_str().unwrap_or_default().to_string(),
            ));
        }
        if !self.extensions.accepts(&parsed) {
            return Err(LinkRejection::Extension);
        }
        if let Some(rule) = self.traps.check(url) {
            return Err(LinkRejection::Trap(rule));
        }
        Ok(())
    }

    pub fn is_valid(&self, url: &str) -> bool {
        match self.check(url) {
            Ok(()) => true,
            Err(rejection) => {
                debug!(url, %rejection, "link filtered");
                false
            }
        }
    }

    pub fn scope(&self) -> &DomainScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> LinkFilter {
        LinkFilter::from_config(&AppConfig::default())
    }

    #[test]
    fn test_valid_page() {
        assert!(filter().is_valid("https://ics.uci.edu/research/areas.html"));
    }

    #[test]
    fn test_rejection_reasons() {
        let f = filter();
        assert!(matches!(f.check("::nope"), Err(LinkRejection::InvalidUrl(_))));
        assert!(matches!(
            f.check("javascript:void(0)"),
            Err(LinkRejection::Scheme(_))
        ));
        assert_eq!(
            f.check("https://evilics.uci.edu/"),
            Err(LinkRejection::OutOfScope("evilics.uci.edu".into()))
        );
        assert_eq!(
            f.check("https://cs.uci.edu/paper.PDF"),
            Err(LinkRejection::Extension)
        );
        assert!(matches!(
            f.check("https://ics.uci.edu/events/2023-05-01/"),
            Err(LinkRejection::Trap(TrapRule::DateSegment(_)))
        ));
    }

    #[test]
    fn test_config_extras_applied() {
        let mut config = AppConfig::default();
        config.filter.extra_extensions.push("bib".into());
        config.filter.extra_trap_keywords.push("/~eppstein/pix".into());
        let f = LinkFilter::from_config(&config);
        assert!(!f.is_valid("https://ics.uci.edu/refs.bib"));
        assert!(!f.is_valid("https://ics.uci.edu/~eppstein/pix/a.html"));
    }
}
