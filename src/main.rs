mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use scopecrawl_core::config::AppConfig;
use scopecrawl_pipeline::CrawlContext;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

fn load_config(path: &str) -> Result<AppConfig> {
    let config_str = std::fs::read_to_string(path).unwrap_or_else(|_| {
        warn!(path, "config file not found, using defaults");
        include_str!("../config/default.toml").to_string()
    });
    let mut config: AppConfig = toml::from_str(&config_str)?;

    // Environment overrides
    if let Ok(v) = std::env::var("SCOPECRAWL_WORKERS") {
        match v.parse::<usize>() {
            Ok(n) if n > 0 && n <= 256 => config.general.workers = n,
            _ => warn!(value = %v, "ignoring invalid SCOPECRAWL_WORKERS"),
        }
    }
    if let Ok(v) = std::env::var("SCOPECRAWL_MIN_WORDS") {
        match v.parse::<usize>() {
            Ok(n) => config.gate.min_words = n,
            Err(_) => warn!(value = %v, "ignoring invalid SCOPECRAWL_MIN_WORDS"),
        }
    }

    config.validate()?;
    Ok(config)
}

async fn async_main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Analyze {
            input,
            output,
            json,
            workers,
        } => {
            let workers = workers.unwrap_or(config.general.workers).max(1);
            let ctx = CrawlContext::from_config(&config)?;
            commands::analyze::run(ctx, &input, output.as_deref(), json, workers).await?;
        }
        Commands::CheckUrl { url } => {
            commands::check_url::run(&config, &url)?;
        }
        Commands::Tokenize { file } => {
            commands::tokenize::run_frequencies(&file)?;
        }
        Commands::Intersect { first, second } => {
            commands::tokenize::run_intersect(&first, &second)?;
        }
    }

    Ok(())
}
