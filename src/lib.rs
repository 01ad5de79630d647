// Export all necessary modules
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod levels;
pub mod risk;
pub mod scoring;

pub use analyzer::{analyze_many, AnalysisReport, Analyzer};
pub use config::AnalysisConfig;
pub use data::{Candle, CandleData, CandleProvider, CsvFileProvider, Series, TimeRange};
pub use error::{AnalysisError, ProviderError};
