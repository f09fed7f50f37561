use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scopecrawl", about = "Page analysis stage for a scoped university crawl")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run fetched pages (JSON lines) through the page gate and print crawl statistics
    Analyze {
        /// JSON-lines file of fetched pages
        input: PathBuf,

        /// Write surviving links here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the statistics report as JSON
        #[arg(long)]
        json: bool,

        /// Worker tasks (overrides general.workers)
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Show how a single URL is normalized and filtered
    CheckUrl {
        url: String,
    },
    /// Print token frequencies of a text file
    Tokenize {
        file: PathBuf,
    },
    /// Count tokens two text files have in common
    Intersect {
        first: PathBuf,
        second: PathBuf,
    },
}
