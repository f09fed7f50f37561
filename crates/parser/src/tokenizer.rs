//! Word and number tokenization used for word counts and frequencies.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use scopecrawl_core::CrawlError;

// Alternation order matters: signed decimals, then signed integers, then words.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?\d*\.\d+|[-+]?\d+|\b\w+\b").unwrap());

/// Lower-cased tokens of `text`, single-character tokens dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| t.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Tokenize a UTF-8 text file line by line.
pub fn tokenize_file(path: impl AsRef<Path>) -> Result<Vec<String>, CrawlError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CrawlError::io(path, e))?;
    let mut tokens = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| CrawlError::io(path, e))?;
        tokens.extend(tokenize(&line));
    }
    Ok(tokens)
}

pub fn word_frequencies<I, S>(tokens: I) -> HashMap<String, u64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut freqs = HashMap::new();
    for token in tokens {
        *freqs.entry(token.as_ref().to_string()).or_insert(0) += 1;
    }
    freqs
}

/// Descending count, ties broken by ascending token.
pub fn sorted_frequencies(freqs: &HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut sorted: Vec<(String, u64)> = freqs.iter().map(|(t, c)| (t.clone(), *c)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Number of distinct tokens present in both sequences.
pub fn common_token_count<A, B>(a: &[A], b: &[B]) -> usize
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let left: HashSet<&str> = a.iter().map(|t| t.as_ref()).collect();
    let right: HashSet<&str> = b.iter().map(|t| t.as_ref()).collect();
    left.intersection(&right).count()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_words_lowercased_and_short_tokens_dropped() {
        assert_eq!(
            tokenize("The Quick brown_fox a I jumps!"),
            vec!["the", "quick", "brown_fox", "jumps"]
        );
    }

    #[test]
    fn test_signed_numbers() {
        assert_eq!(
            tokenize("temps -0.25 +3.14 and -42 +7 .5"),
            vec!["temps", "-0.25", "+3.14", "and", "-42", "+7", ".5"]
        );
    }

    #[test]
    fn test_single_digit_dropped_but_signed_kept() {
        assert_eq!(tokenize("7 -7 77"), vec!["-7", "77"]);
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(tokenize("Café Zürich naïve"), vec!["café", "zürich", "naïve"]);
    }

    #[test]
    fn test_frequencies_sorted_with_tie_break() {
        let freqs = word_frequencies(["beta", "alpha", "gamma", "beta", "alpha", "delta"]);
        let sorted = sorted_frequencies(&freqs);
        assert_eq!(
            sorted,
            vec![
                ("alpha".to_string(), 2),
                ("beta".to_string(), 2),
                ("delta".to_string(), 1),
                ("gamma".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_common_token_count() {
        let a = tokenize("we like rust and we like parsers");
        let b = tokenize("parsers like us");
        assert_eq!(common_token_count(&a, &b), 2);
    }

    #[test]
    fn test_tokenize_file_missing_is_error() {
        let err = tokenize_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, CrawlError::Io { .. }));
    }

    #[test]
    fn test_tokenize_file_reads_lines() {
        let path = std::env::temp_dir().join(format!("scopecrawl-tok-{}.txt", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Hello world").unwrap();
        writeln!(file, "hello again").unwrap();
        drop(file);
        let tokens = tokenize_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(tokens, vec!["hello", "world", "hello", "again"]);
    }
}
