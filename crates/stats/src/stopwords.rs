use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;

use scopecrawl_core::CrawlError;

const BUILTIN: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "almost", "also",
    "am", "an", "and", "any", "are", "aren't", "as", "at", "be", "because", "been",
    "before", "being", "below", "between", "both", "but", "by", "can", "cannot",
    "could", "couldn't", "did", "didn't", "do", "does", "doesn't", "doing", "don't",
    "down", "during", "each", "few", "for", "from", "further", "had", "hadn't", "has",
    "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i", "i'd",
    "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its",
    "itself", "let's", "me", "more", "most", "mustn't", "my", "myself", "no", "nor",
    "not", "of", "off", "on", "once", "only", "or", "other", "ought", "our", "ours",
    "ourselves", "out", "over", "own", "same", "shan't", "she", "she'd", "she'll",
    "she's", "should", "shouldn't", "so", "some", "such", "than", "that", "that's",
    "the", "their", "theirs", "them", "themselves", "then", "there", "there's", "these",
    "they", "they'd", "they'll", "they're", "they've", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll",
    "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with",
    "won't", "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your",
    "yours", "yourself", "yourselves",
];

static BUILTIN_SET: Lazy<Arc<HashSet<String>>> =
    Lazy::new(|| Arc::new(BUILTIN.iter().map(|w| w.to_string()).collect()));

/// Immutable set of words left out of frequency counts. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: Arc<HashSet<String>>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Stopwords {
    pub fn builtin() -> Self {
        Self {
            words: Arc::clone(&BUILTIN_SET),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: Arc::new(
                words
                    .into_iter()
                    .map(|w| w.as_ref().trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect(),
            ),
        }
    }

    /// Whitespace-separated words; `#` starts a comment line.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CrawlError::io(path, e))?;
        Ok(Self::from_words(
            content
                .lines()
                .filter(|l| !l.trim_start().starts_with('#'))
                .flat_map(str::split_whitespace),
        ))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin() {
        let stopwords = Stopwords::builtin();
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("yourselves"));
        assert!(!stopwords.contains("informatics"));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("scopecrawl-stop-{}.txt", std::process::id()));
        std::fs::write(&path, "# custom list\nUCI  irvine\nics\n").unwrap();
        let stopwords = Stopwords::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(stopwords.len(), 3);
        assert!(stopwords.contains("uci"));
        assert!(!stopwords.contains("the"));
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        assert!(matches!(
            Stopwords::from_file("/no/such/stopwords.txt"),
            Err(CrawlError::Io { .. })
        ));
    }
}
