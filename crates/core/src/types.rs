use std::fmt;

use serde::Serialize;

/// A fetched page as handed over by the fetcher. Read-only to the gate.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub requested_url: String,
    pub final_url: String,
    pub status: u16,
    pub body: Option<Vec<u8>>,
}

impl PageResponse {
    pub fn new(
        requested_url: impl Into<String>,
        final_url: impl Into<String>,
        status: u16,
        body: Vec<u8>,
    ) -> Self {
        Self {
            requested_url: requested_url.into(),
            final_url: final_url.into(),
            status,
            body: Some(body),
        }
    }

    /// A response that carried no content at all (as opposed to an empty body).
    pub fn without_body(
        requested_url: impl Into<String>,
        final_url: impl Into<String>,
        status: u16,
    ) -> Self {
        Self {
            requested_url: requested_url.into(),
            final_url: final_url.into(),
            status,
            body: None,
        }
    }

    pub fn body_len(&self) -> usize {
        self.body.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Why the page gate turned a page away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NoResponse,
    BadStatus(u16),
    MissingBody,
    BodyTooSmall { size: usize, min: usize },
    TooFewWords { count: usize, min: usize },
    ExactDuplicate,
    ChecksumDuplicate,
    BodyTooLarge { size: usize, max: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no response"),
            Self::BadStatus(code) => write!(f, "status {}", code),
            Self::MissingBody => write!(f, "missing body"),
            Self::BodyTooSmall { size, min } => {
                write!(f, "body too small: {} bytes (min {})", size, min)
            }
            Self::TooFewWords { count, min } => {
                write!(f, "too few words: {} (min {})", count, min)
            }
            Self::ExactDuplicate => write!(f, "exact duplicate text"),
            Self::ChecksumDuplicate => write!(f, "duplicate checksum"),
            Self::BodyTooLarge { size, max } => {
                write!(f, "body too large: {} bytes (max {})", size, max)
            }
        }
    }
}

/// Terminal state of one page gate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Done(Vec<String>),
    Rejected(RejectReason),
}

impl GateOutcome {
    /// Links to hand to the frontier. Empty for rejected pages.
    pub fn into_links(self) -> Vec<String> {
        match self {
            Self::Done(links) => links,
            Self::Rejected(_) => Vec::new(),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LongestPage {
    pub url: String,
    pub words: usize,
}

/// Snapshot of crawl-wide statistics, produced at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub unique_urls: usize,
    pub longest_page: Option<LongestPage>,
    pub subdomains: Vec<(String, u64)>,
    pub top_words: Vec<(String, u64)>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl StatsReport {
    pub fn longest_page_url(&self) -> Option<&str> {
        self.longest_page.as_ref().map(|p| p.url.as_str())
    }
}
