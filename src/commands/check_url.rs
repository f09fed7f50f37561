use anyhow::Result;

use scopecrawl_core::AppConfig;
use scopecrawl_filter::{normalize_url, LinkFilter};

pub fn run(config: &AppConfig, url: &str) -> Result<()> {
    let filter = LinkFilter::from_config(config);

    match normalize_url(url) {
        Ok(normalized) => println!("normalized: {}", normalized),
        Err(e) => println!("normalized: - ({})", e),
    }
    match filter.check(url) {
        Ok(()) => println!("verdict:    crawl"),
        Err(rejection) => println!("verdict:    skip ({})", rejection),
    }
    Ok(())
}
