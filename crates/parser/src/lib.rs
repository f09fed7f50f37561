pub mod html;
pub mod tokenizer;

use tracing::debug;
use url::Url;

use scopecrawl_core::CrawlError;

pub use tokenizer::{common_token_count, sorted_frequencies, tokenize, tokenize_file, word_frequencies};

/// Leading bytes inspected for binary content.
const SNIFF_LEN: usize = 1024;

/// Plain text and candidate links of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub links: Vec<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.links.is_empty()
    }
}

/// Parse `body` fetched from `final_url`. At most `max_parse_bytes` bytes
/// are parsed. Binary bodies are a `ParseFailure`; html5ever recovers from
/// everything else, so markup errors degrade to a thinner extraction.
pub fn extract_page(
    body: &[u8],
    final_url: &str,
    max_parse_bytes: usize,
) -> Result<Extraction, CrawlError> {
    let base = Url::parse(final_url)
        .map_err(|e| CrawlError::InvalidUrl(format!("{final_url}: {e}")))?;

    if body[..body.len().min(SNIFF_LEN)].contains(&0) {
        return Err(CrawlError::ParseFailure(format!(
            "{final_url}: binary content"
        )));
    }

    let body = if body.len() > max_parse_bytes {
        debug!(url = final_url, size = body.len(), max_parse_bytes, "truncating body before parse");
        &body[..max_parse_bytes]
    } else {
        body
    };
    let body_str = String::from_utf8_lossy(body);

    let result = html::parse_html(&body_str, &base);
    Ok(Extraction {
        text: result.body_text,
        links: result.links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_page() {
        let body = br#"<html><body><p>Informatics news</p><a href="/news/1.html">one</a></body></html>"#;
        let page = extract_page(body, "https://informatics.uci.edu/", 1024).unwrap();
        assert_eq!(page.text, "Informatics news");
        assert_eq!(page.links, vec!["https://informatics.uci.edu/news/1.html"]);
    }

    #[test]
    fn test_binary_body_is_parse_failure() {
        let body = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
        let err = extract_page(body, "https://ics.uci.edu/logo", 1024).unwrap_err();
        assert!(matches!(err, CrawlError::ParseFailure(_)));
    }

    #[test]
    fn test_invalid_final_url() {
        let err = extract_page(b"<p>hi</p>", "not-a-url", 1024).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUrl(_)));
    }

    #[test]
    fn test_parse_capped() {
        let body = b"<p>kept words</p><p>dropped words</p>";
        let page = extract_page(body, "https://ics.uci.edu/", 17).unwrap();
        assert_eq!(page.text, "kept words");
    }
}
