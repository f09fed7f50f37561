use std::path::Path;

use anyhow::Result;

use scopecrawl_parser::{common_token_count, sorted_frequencies, tokenize_file, word_frequencies};

pub fn run_frequencies(file: &Path) -> Result<()> {
    let tokens = tokenize_file(file)?;
    let freqs = word_frequencies(&tokens);
    for (token, count) in sorted_frequencies(&freqs) {
        println!("{} -> {}", token, count);
    }
    Ok(())
}

pub fn run_intersect(first: &Path, second: &Path) -> Result<()> {
    let a = tokenize_file(first)?;
    let b = tokenize_file(second)?;
    println!("{}", common_token_count(&a, &b));
    Ok(())
}
