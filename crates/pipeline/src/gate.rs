//! Per-page gate
//!
//! Runs one fetched page through the fixed sequence of checks:
//! status, minimum size, parse, word count, exact/checksum dedup, size
//! ceiling, statistics update, link filtering. Any failing check ends the
//! run with `GateOutcome::Rejected` and no further state is touched.

use std::fmt;

use tracing::{debug, info, warn};
use url::Url;

use scopecrawl_core::{CrawlError, GateOutcome, PageResponse, RejectReason};
use scopecrawl_filter::normalize_url;
use scopecrawl_parser::{extract_page, tokenize, Extraction};
use scopecrawl_stats::DedupVerdict;

use crate::context::CrawlContext;

/// Stages a page passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Received,
    SizeChecked,
    Parsed,
    WordCountChecked,
    DedupChecked,
    SizeCeilingChecked,
    StatsUpdated,
    LinksExtracted,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::SizeChecked => "size-checked",
            Self::Parsed => "parsed",
            Self::WordCountChecked => "word-count-checked",
            Self::DedupChecked => "dedup-checked",
            Self::SizeCeilingChecked => "size-ceiling-checked",
            Self::StatsUpdated => "stats-updated",
            Self::LinksExtracted => "links-extracted",
        };
        f.write_str(name)
    }
}

fn reject(url: &str, state: GateState, reason: RejectReason) -> GateOutcome {
    info!(url, %state, %reason, "page skipped");
    GateOutcome::Rejected(reason)
}

/// Process one page. Never fails: every error maps to a rejection or to a
/// dropped link.
pub fn process_page(
    ctx: &CrawlContext,
    requested_url: &str,
    resp: Option<&PageResponse>,
) -> GateOutcome {
    let Some(resp) = resp else {
        return reject(requested_url, GateState::Received, RejectReason::NoResponse);
    };
    if resp.status != 200 {
        return reject(
            requested_url,
            GateState::Received,
            RejectReason::BadStatus(resp.status),
        );
    }

    let Some(body) = resp.body.as_deref() else {
        return reject(requested_url, GateState::Received, RejectReason::MissingBody);
    };
    if body.len() < ctx.gate.min_body_bytes {
        return reject(
            requested_url,
            GateState::Received,
            RejectReason::BodyTooSmall {
                size: body.len(),
                min: ctx.gate.min_body_bytes,
            },
        );
    }

    let extraction = match extract_page(body, &resp.final_url, ctx.gate.max_body_bytes) {
        Ok(extraction) => extraction,
        Err(e @ CrawlError::ParseFailure(_)) => {
            warn!(url = requested_url, "parse error: {}", e);
            Extraction::default()
        }
        Err(e) => {
            warn!(url = requested_url, final_url = %resp.final_url, "cannot extract page: {}", e);
            Extraction::default()
        }
    };

    let tokens = tokenize(&extraction.text);
    if tokens.len() < ctx.gate.min_words {
        return reject(
            requested_url,
            GateState::Parsed,
            RejectReason::TooFewWords {
                count: tokens.len(),
                min: ctx.gate.min_words,
            },
        );
    }

    match ctx.detector.check_and_record(&extraction.text) {
        DedupVerdict::New => {}
        DedupVerdict::ExactDuplicate => {
            return reject(
                requested_url,
                GateState::WordCountChecked,
                RejectReason::ExactDuplicate,
            );
        }
        DedupVerdict::ChecksumDuplicate => {
            return reject(
                requested_url,
                GateState::WordCountChecked,
                RejectReason::ChecksumDuplicate,
            );
        }
    }

    if body.len() > ctx.gate.max_body_bytes {
        return reject(
            requested_url,
            GateState::DedupChecked,
            RejectReason::BodyTooLarge {
                size: body.len(),
                max: ctx.gate.max_body_bytes,
            },
        );
    }

    record_stats(ctx, requested_url, &resp.final_url, &tokens);
    debug!(url = requested_url, state = %GateState::StatsUpdated, words = tokens.len(), "stats updated");

    let candidates = extraction.links.len();
    let links: Vec<String> = extraction
        .links
        .into_iter()
        .filter(|link| ctx.filter.is_valid(link))
        .collect();
    debug!(
        url = requested_url,
        state = %GateState::LinksExtracted,
        candidates,
        kept = links.len(),
        "links filtered"
    );

    GateOutcome::Done(links)
}

fn record_stats(ctx: &CrawlContext, requested_url: &str, final_url: &str, tokens: &[String]) {
    // The final URL parsed during extraction; the requested URL is a fallback only
    let page_url = if Url::parse(final_url).is_ok() {
        final_url
    } else {
        requested_url
    };

    match normalize_url(page_url) {
        Ok(normalized) => {
            ctx.stats.record_unique_url(&normalized);
        }
        Err(e) => warn!(url = page_url, "not counted as unique: {}", e),
    }

    ctx.stats.record_page_length(tokens.len(), page_url);

    if let Some(host) = Url::parse(page_url).ok().and_then(|u| u.host_str().map(str::to_string)) {
        ctx.stats.record_subdomain(&host);
    }

    ctx.stats.record_words(tokens);
}
