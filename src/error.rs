use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// Indicator warm-up and degenerate numeric ranges are absorbed inside the
/// individual computations (null padding / neutral fallbacks) and never
/// reach this type; what remains is the small set of conditions a caller
/// has to act on.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The candle series is empty. Analysis is not possible; callers should
    /// check the provider result before retrying.
    #[error("no candle data available for analysis")]
    NoData,

    #[error("insufficient history: need {need} candles, got {got}")]
    InsufficientHistory { need: usize, got: usize },

    #[error("invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: &'static str },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Errors from a candle provider implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("failed to read candle source: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed candle record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
