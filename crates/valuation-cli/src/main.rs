use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use snapshot_client::{FileSnapshotProvider, SnapshotClient};
use valuation_core::{FetchError, FinancialSnapshot, SnapshotProvider, ValuationResult};
use valuation_orchestrator::{CachedSnapshotProvider, HistoryLog, ValuationOrchestrator};

mod config;
mod report;

use config::{AppConfig, SnapshotSource};
use report::{HistoryReport, ResultReport};

#[derive(Parser)]
#[command(
    name = "intelligent-investor",
    version,
    about = "Value investing analysis: Graham checklist, Piotroski F-Score and intrinsic value"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one or more tickers
    Analyze {
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show past valuations, newest first
    History {
        #[arg(long)]
        json: bool,
    },
    /// Forget all past valuations
    ClearHistory,
}

/// Provider selected by SNAPSHOT_SOURCE
enum Source {
    Http(SnapshotClient),
    File(FileSnapshotProvider),
}

#[async_trait]
impl SnapshotProvider for Source {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, FetchError> {
        match self {
            Source::Http(client) => client.fetch_snapshot(ticker).await,
            Source::File(files) => files.fetch_snapshot(ticker).await,
        }
    }
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    // stdout carries the reports
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let history = HistoryLog::open(&config.history_path, config.history_capacity)
        .await
        .with_context(|| format!("Failed to open history at {}", config.history_path.display()))?;

    match cli.command {
        Command::Analyze { tickers, json } => analyze(&config, history, &tickers, json).await,
        Command::History { json } => {
            let entries = history.entries().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", HistoryReport(&entries));
            }
            Ok(())
        }
        Command::ClearHistory => {
            history.clear().await.context("Failed to clear history")?;
            println!("History cleared.");
            Ok(())
        }
    }
}

async fn analyze(config: &AppConfig, history: HistoryLog, tickers: &[String], json: bool) -> Result<()> {
    let source = match config.source {
        SnapshotSource::Http => Source::Http(SnapshotClient::new(config.client_config())),
        SnapshotSource::File => Source::File(FileSnapshotProvider::new(&config.snapshot_dir)),
    };
    let provider = CachedSnapshotProvider::with_ttl(source, config.cache_ttl);
    let orchestrator = ValuationOrchestrator::new(provider, Arc::new(history));

    let mut succeeded: Vec<ValuationResult> = Vec::new();
    let mut failed = 0usize;

    for (ticker, outcome) in orchestrator.evaluate_many(tickers).await {
        match outcome {
            Ok(result) if json => succeeded.push(result),
            Ok(result) => {
                if !succeeded.is_empty() {
                    println!("{}", "=".repeat(72));
                }
                print!("{}", ResultReport(&result));
                succeeded.push(result);
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}: {}", ticker.trim(), e.user_message());
            }
        }
    }

    if json {
        let rendered = match succeeded.as_slice() {
            [single] => serde_json::to_string_pretty(single)?,
            all => serde_json::to_string_pretty(all)?,
        };
        println!("{}", rendered);
    }

    if failed > 0 {
        bail!("{} of {} tickers could not be analyzed", failed, tickers.len());
    }
    Ok(())
}
