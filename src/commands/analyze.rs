use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use scopecrawl_core::{GateOutcome, PageResponse, StatsReport};
use scopecrawl_pipeline::{process_page, CrawlContext};

/// One fetched page as dumped by the fetcher. A missing `status` means the
/// fetch produced no response at all.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    pub requested_url: String,
    #[serde(default)]
    pub final_url: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub body: Option<String>,
}

impl PageRecord {
    fn into_response(self) -> (String, Option<PageResponse>) {
        let Some(status) = self.status else {
            return (self.requested_url, None);
        };
        let final_url = self.final_url.unwrap_or_else(|| self.requested_url.clone());
        let resp = match self.body {
            Some(body) => PageResponse::new(&self.requested_url, final_url, status, body.into_bytes()),
            None => PageResponse::without_body(&self.requested_url, final_url, status),
        };
        (self.requested_url, Some(resp))
    }
}

/// Surviving links of one accepted page.
#[derive(Debug)]
pub struct PageLinks {
    pub source: String,
    pub links: Vec<String>,
}

pub fn read_records(path: &Path) -> Result<Vec<PageRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut records = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<PageRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(path = %path.display(), line = lineno + 1, "skipping malformed record: {}", e),
        }
    }
    Ok(records)
}

/// Fan `records` out to `workers` tasks sharing `ctx`. Links of accepted
/// pages go out on `tx`. Returns (accepted, rejected) page counts.
pub async fn process_records(
    ctx: Arc<CrawlContext>,
    records: Vec<PageRecord>,
    workers: usize,
    tx: mpsc::Sender<PageLinks>,
) -> (usize, usize) {
    let queue = Arc::new(Mutex::new(VecDeque::from(records)));
    let accepted = Arc::new(AtomicUsize::new(0));
    let rejected = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers.max(1) {
        let queue = Arc::clone(&queue);
        let ctx = Arc::clone(&ctx);
        let tx = tx.clone();
        let accepted = Arc::clone(&accepted);
        let rejected = Arc::clone(&rejected);

        handles.push(tokio::spawn(async move {
            loop {
                let Some(record) = queue.lock().await.pop_front() else {
                    break;
                };
                let (requested_url, resp) = record.into_response();
                match process_page(&ctx, &requested_url, resp.as_ref()) {
                    GateOutcome::Done(links) => {
                        accepted.fetch_add(1, Ordering::Relaxed);
                        let page = PageLinks {
                            source: requested_url,
                            links,
                        };
                        if tx.send(page).await.is_err() {
                            warn!(worker_id, "link channel closed");
                            break;
                        }
                    }
                    GateOutcome::Rejected(_) => {
                        rejected.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        }));
    }
    drop(tx);

    for handle in handles {
        if let Err(e) = handle.await {
            warn!("worker task failed: {}", e);
        }
    }

    (accepted.load(Ordering::Relaxed), rejected.load(Ordering::Relaxed))
}

pub async fn run(
    ctx: CrawlContext,
    input: &Path,
    output: Option<&Path>,
    json: bool,
    workers: usize,
) -> Result<()> {
    let records = read_records(input)?;
    info!(pages = records.len(), workers, "analyzing pages");

    let sink: Box<dyn Write + Send> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    let (tx, mut rx) = mpsc::channel::<PageLinks>(1024);
    let writer = tokio::spawn(async move {
        let mut out = BufWriter::new(sink);
        let mut written = 0usize;
        while let Some(page) = rx.recv().await {
            for link in &page.links {
                writeln!(out, "{}\t{}", page.source, link)?;
                written += 1;
            }
        }
        out.flush()?;
        Ok::<usize, std::io::Error>(written)
    });

    let ctx = Arc::new(ctx);
    let (accepted, rejected) = process_records(Arc::clone(&ctx), records, workers, tx).await;
    let written = writer.await??;
    info!(accepted, rejected, links = written, "analysis complete");

    let report = ctx.stats.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &StatsReport) {
    println!("Unique pages:  {}", report.unique_urls);
    match &report.longest_page {
        Some(page) => println!("Longest page:  {} ({} words)", page.url, page.words),
        None => println!("Longest page:  -"),
    }
    println!("\nSubdomains:");
    for (host, count) in &report.subdomains {
        println!("  {}, {}", host, count);
    }
    println!("\nTop {} words:", report.top_words.len());
    for (rank, (word, count)) in report.top_words.iter().enumerate() {
        println!("  {:>2}. {} -> {}", rank + 1, word, count);
    }
}

#[cfg(test)]
mod tests {
    use scopecrawl_core::AppConfig;
    use scopecrawl_stats::Stopwords;

    use super::*;

    fn body(prefix: &str, links: &[&str]) -> String {
        let words: Vec<String> = (0..60).map(|i| format!("{prefix}{i:02}")).collect();
        let anchors: String = links.iter().map(|h| format!(r#"<a href="{h}"></a>"#)).collect();
        format!("<html><body><p>{}</p>{}</body></html>", words.join(" "), anchors)
    }

    #[test]
    fn test_record_without_status_has_no_response() {
        let record: PageRecord =
            serde_json::from_str(r#"{"requested_url": "https://ics.uci.edu/"}"#).unwrap();
        let (url, resp) = record.into_response();
        assert_eq!(url, "https://ics.uci.edu/");
        assert!(resp.is_none());
    }

    #[test]
    fn test_final_url_defaults_to_requested() {
        let record: PageRecord = serde_json::from_str(
            r#"{"requested_url": "https://cs.uci.edu/a", "status": 200, "body": "<p>x</p>"}"#,
        )
        .unwrap();
        let (_, resp) = record.into_response();
        let resp = resp.unwrap();
        assert_eq!(resp.final_url, "https://cs.uci.edu/a");
        assert_eq!(resp.body_len(), 8);
    }

    #[tokio::test]
    async fn test_process_records_shares_state_across_workers() {
        let ctx = Arc::new(CrawlContext::new(&AppConfig::default(), Stopwords::builtin()));
        let records = vec![
            PageRecord {
                requested_url: "https://ics.uci.edu/a.html".into(),
                final_url: None,
                status: Some(200),
                body: Some(body("alpha", &["/b.html", "https://example.org/"])),
            },
            PageRecord {
                requested_url: "https://ics.uci.edu/copy.html".into(),
                final_url: None,
                status: Some(200),
                body: Some(body("alpha", &["/b.html"])),
            },
            PageRecord {
                requested_url: "https://stat.uci.edu/gone".into(),
                final_url: None,
                status: Some(404),
                body: None,
            },
        ];

        let (tx, mut rx) = mpsc::channel(16);
        let (accepted, rejected) = process_records(Arc::clone(&ctx), records, 4, tx).await;
        assert_eq!((accepted, rejected), (1, 2));

        // Either copy may win the race; both leave the same single link
        let page = rx.recv().await.unwrap();
        assert!(page.source.starts_with("https://ics.uci.edu/"));
        assert_eq!(page.links, vec!["https://ics.uci.edu/b.html"]);
        assert!(rx.recv().await.is_none());
        assert_eq!(ctx.stats.unique_url_count(), 1);
    }
}
