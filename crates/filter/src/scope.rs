use std::collections::HashSet;

use url::Url;

/// Exact-match host allow-list. `evilics.uci.edu` does not pass for
/// `ics.uci.edu`, and neither does `www.ics.uci.edu`.
#[derive(Debug, Clone)]
pub struct DomainScope {
    hosts: HashSet<String>,
}

impl DomainScope {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    pub fn has_web_scheme(url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    /// True when the scheme is http(s) and the authority is a listed host.
    /// Userinfo or an explicit port makes the authority differ from the host.
    pub fn contains(&self, url: &Url) -> bool {
        if !Self::has_web_scheme(url) {
            return false;
        }
        if !url.username().is_empty() || url.password().is_some() || url.port().is_some() {
            return false;
        }
        url.host_str()
            .map(|host| self.hosts.contains(host))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> DomainScope {
        DomainScope::new(["ics.uci.edu", "cs.uci.edu", "informatics.uci.edu", "stat.uci.edu"])
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_exact_hosts_accepted() {
        let scope = scope();
        assert!(scope.contains(&url("https://ics.uci.edu/about")));
        assert!(scope.contains(&url("http://STAT.uci.edu/")));
    }

    #[test]
    fn test_suffix_only_match_rejected() {
        let scope = scope();
        assert!(!scope.contains(&url("https://evilics.uci.edu/")));
        assert!(!scope.contains(&url("https://www.ics.uci.edu/")));
        assert!(!scope.contains(&url("https://uci.edu/")));
        assert!(!scope.contains(&url("https://ics.uci.edu.attacker.com/")));
    }

    #[test]
    fn test_non_web_schemes_rejected() {
        let scope = scope();
        assert!(!scope.contains(&url("ftp://ics.uci.edu/pub")));
        assert!(!scope.contains(&url("mailto:someone@ics.uci.edu")));
    }

    #[test]
    fn test_authority_with_port_or_userinfo_rejected() {
        let scope = scope();
        assert!(!scope.contains(&url("https://ics.uci.edu:8443/")));
        assert!(!scope.contains(&url("https://user@ics.uci.edu/")));
    }
}
