// src/cli.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::analyzer::Analyzer;
use crate::config::AnalysisConfig;
use crate::data::provider::{CandleProvider, CsvFileProvider};

#[derive(Parser)]
#[command(name = "index-analyzer")]
#[command(about = "Technical analysis engine for OHLCV market data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full analysis pipeline and print the report
    Analyze {
        /// CSV file with timestamp,open,high,low,close,volume rows
        #[arg(short, long)]
        file: PathBuf,

        /// Symbol label for the report
        #[arg(short, long, default_value = "UNKNOWN")]
        symbol: String,

        /// Interval label (e.g. "1h", "4h", "1d")
        #[arg(short, long, default_value = "1d")]
        interval: String,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print only the current indicator snapshot
    Indicators {
        /// CSV file with candle data
        #[arg(short, long)]
        file: PathBuf,

        /// Symbol label for the report
        #[arg(short, long, default_value = "UNKNOWN")]
        symbol: String,

        /// Interval label
        #[arg(short, long, default_value = "1d")]
        interval: String,
    },

    /// Print detected candlestick patterns and their statistics
    Patterns {
        /// CSV file with candle data
        #[arg(short, long)]
        file: PathBuf,

        /// Symbol label for the report
        #[arg(short, long, default_value = "UNKNOWN")]
        symbol: String,

        /// Interval label
        #[arg(short, long, default_value = "1d")]
        interval: String,
    },

    /// Print Fibonacci and support/resistance levels
    Levels {
        /// CSV file with candle data
        #[arg(short, long)]
        file: PathBuf,

        /// Symbol label for the report
        #[arg(short, long, default_value = "UNKNOWN")]
        symbol: String,

        /// Interval label
        #[arg(short, long, default_value = "1d")]
        interval: String,
    },
}

pub async fn execute_command(command: Commands) -> Result<()> {
    let config = AnalysisConfig::load().unwrap_or_else(|e| {
        info!("falling back to default configuration: {e}");
        AnalysisConfig::default()
    });
    let analyzer = Analyzer::new(config);

    match command {
        Commands::Analyze {
            file,
            symbol,
            interval,
            output,
        } => {
            let data = CsvFileProvider::new(&file)
                .fetch(&symbol, &interval, None)
                .await
                .context("failed to load candle data")?;
            let report = analyzer
                .analyze(&data)
                .context("could not complete analysis for the given input")?;
            let json = serde_json::to_string_pretty(&report.to_snapshot())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("report written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Indicators {
            file,
            symbol,
            interval,
        } => {
            let data = CsvFileProvider::new(&file)
                .fetch(&symbol, &interval, None)
                .await
                .context("failed to load candle data")?;
            let (_, snapshot) = analyzer
                .indicators(&data)
                .context("could not compute indicators for the given input")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Patterns {
            file,
            symbol,
            interval,
        } => {
            let data = CsvFileProvider::new(&file)
                .fetch(&symbol, &interval, None)
                .await
                .context("failed to load candle data")?;
            let (patterns, statistics) = analyzer.patterns(&data);
            let combined = serde_json::json!({
                "patterns": patterns,
                "statistics": statistics,
            });
            println!("{}", serde_json::to_string_pretty(&combined)?);
        }
        Commands::Levels {
            file,
            symbol,
            interval,
        } => {
            let data = CsvFileProvider::new(&file)
                .fetch(&symbol, &interval, None)
                .await
                .context("failed to load candle data")?;
            let levels = analyzer.levels(&data);
            println!("{}", serde_json::to_string_pretty(&levels)?);
        }
    }

    Ok(())
}
