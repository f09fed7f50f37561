//! Content duplicate detection
//!
//! A page is new only if both its exact extracted text and the SHA-256 of
//! that text are unseen. Both sets grow for the lifetime of the crawl.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use sha2::{Digest, Sha256};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageChecksum([u8; 32]);

impl PageChecksum {
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PageChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupVerdict {
    New,
    ExactDuplicate,
    ChecksumDuplicate,
}

impl DedupVerdict {
    pub fn is_new(self) -> bool {
        self == Self::New
    }
}

#[derive(Default)]
struct SeenContent {
    texts: HashSet<String>,
    checksums: HashSet<PageChecksum>,
}

/// Both sets sit behind one lock so check-then-insert is atomic across
/// concurrent gate runs.
#[derive(Default)]
pub struct DuplicateDetector {
    seen: Mutex<SeenContent>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `text` if it is new; report what was found otherwise.
    pub fn check_and_record(&self, text: &str) -> DedupVerdict {
        let checksum = PageChecksum::of(text);
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);

        if seen.texts.contains(text) {
            debug!(%checksum, "exact text already seen");
            return DedupVerdict::ExactDuplicate;
        }
        if seen.checksums.contains(&checksum) {
            debug!(%checksum, "checksum already seen");
            return DedupVerdict::ChecksumDuplicate;
        }

        seen.texts.insert(text.to_string());
        seen.checksums.insert(checksum);
        DedupVerdict::New
    }

    pub fn is_new(&self, text: &str) -> bool {
        self.check_and_record(text).is_new()
    }

    /// Number of distinct pages recorded.
    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .checksums
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_same_text_twice() {
        let detector = DuplicateDetector::new();
        assert_eq!(detector.check_and_record("faculty directory"), DedupVerdict::New);
        assert_eq!(
            detector.check_and_record("faculty directory"),
            DedupVerdict::ExactDuplicate
        );
        assert!(detector.is_new("faculty directory page two"));
        assert_eq!(detector.len(), 2);
    }

    #[test]
    fn test_checksum_stable_and_hex() {
        let a = PageChecksum::of("hello");
        assert_eq!(a, PageChecksum::of("hello"));
        assert_ne!(a, PageChecksum::of("hello!"));
        assert_eq!(
            a.to_string(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_concurrent_inserts_accept_exactly_once() {
        let detector = Arc::new(DuplicateDetector::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let detector = Arc::clone(&detector);
                thread::spawn(move || detector.is_new("shared page text"))
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|new| *new)
            .count();
        assert_eq!(accepted, 1);
    }
}
