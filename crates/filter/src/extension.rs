use std::collections::HashSet;

use percent_encoding::percent_decode_str;
use url::Url;

/// Extensions of resources that are never HTML pages.
pub const NON_HTML_EXTENSIONS: &[&str] = &[
    // style sheets and scripts
    "css", "js",
    // images
    "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "psd",
    // audio and video
    "mid", "mp2", "mp3", "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv",
    "rm", "smil", "wmv", "swf", "wma",
    // documents and data
    "pdf", "ps", "eps", "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data",
    "dat", "epub", "rtf", "csv", "arff", "thmx", "mso",
    // archives and binaries
    "exe", "bz2", "tar", "msi", "bin", "7z", "dmg", "iso", "dll", "cnf", "tgz", "sha1", "jar",
    "zip", "rar", "gz",
];

#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    blocked: HashSet<String>,
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl ExtensionFilter {
    /// Built-in table plus `extra` entries (leading dots are ignored).
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blocked: HashSet<String> =
            NON_HTML_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        blocked.extend(
            extra
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty()),
        );
        Self { blocked }
    }

    /// Checks the decoded path only; the query string plays no part.
    pub fn accepts(&self, url: &Url) -> bool {
        let decoded = percent_decode_str(url.path()).decode_utf8_lossy();
        self.accepts_path(&decoded.to_lowercase())
    }

    /// `path` must already be decoded and lower-cased.
    pub fn accepts_path(&self, path: &str) -> bool {
        let last_segment = path.rsplit('/').next().unwrap_or(path);
        match last_segment.rsplit_once('.') {
            Some((_, ext)) => !self.blocked.contains(ext),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(s: &str) -> bool {
        ExtensionFilter::default().accepts(&Url::parse(s).unwrap())
    }

    #[test]
    fn test_documents_rejected_case_insensitively() {
        assert!(!accepts("https://cs.uci.edu/paper.PDF"));
        assert!(!accepts("https://cs.uci.edu/slides/week1.pptx"));
        assert!(!accepts("https://ics.uci.edu/dist/release.tar.gz"));
    }

    #[test]
    fn test_match_anchored_at_end() {
        assert!(accepts("https://cs.uci.edu/paper.pdf.html"));
        assert!(accepts("https://cs.uci.edu/pdf/index"));
        assert!(accepts("https://cs.uci.edu/files.zip/"));
    }

    #[test]
    fn test_query_ignored() {
        assert!(accepts("https://ics.uci.edu/view?file=report.pdf"));
        assert!(!accepts("https://ics.uci.edu/photo.png?size=large"));
    }

    #[test]
    fn test_percent_encoded_path_decoded() {
        assert!(!accepts("https://ics.uci.edu/my%20notes.PD%46"));
    }

    #[test]
    fn test_extra_extensions() {
        let filter = ExtensionFilter::new([".ppsx", "Bib"]);
        assert!(!filter.accepts_path("/talks/keynote.ppsx"));
        assert!(!filter.accepts_path("/refs/all.bib"));
        assert!(filter.accepts_path("/refs/all.html"));
    }
}
