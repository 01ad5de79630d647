//! The analysis entry point: runs indicators → levels → patterns →
//! scoring over one immutable series and assembles the report object.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::data::models::{CandleData, Series};
use crate::error::AnalysisError;
use crate::indicators::patterns::{Pattern, PatternRecognizer, PatternStatistics};
use crate::indicators::{rsi_divergences, Divergence, IndicatorEngine, IndicatorSnapshot};
use crate::levels::{LevelDetector, LevelSet};
use crate::risk::{risk_metrics, RiskMetrics};
use crate::scoring::{ScoreAggregator, ScoreResult};

/// The aggregate result of one analysis run. Everything in here is
/// derived, read-only, and rebuilt wholesale on re-analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub interval: String,
    /// Timestamp of the last analyzed candle.
    pub as_of: DateTime<Utc>,
    pub current_price: f64,
    pub indicators: IndicatorSnapshot,
    pub levels: LevelSet,
    pub patterns: Vec<Pattern>,
    pub pattern_statistics: PatternStatistics,
    pub score: ScoreResult,
    pub risk: Option<RiskMetrics>,
    pub divergences: Vec<Divergence>,
}

impl AnalysisReport {
    /// JSON snapshot for the reporting layer. Undefined indicator values
    /// serialize as null; non-finite numbers cannot cross this boundary
    /// (serialization maps them to null as well).
    pub fn to_snapshot(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Stateless analysis façade. Each call processes one series end to end;
/// nothing is shared between runs.
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Full pipeline over one candle series.
    pub fn analyze(&self, data: &CandleData) -> Result<AnalysisReport, AnalysisError> {
        if data.is_empty() {
            return Err(AnalysisError::NoData);
        }
        data.validate()?;

        let (series, indicators) = IndicatorEngine::compute(data, &self.config)?;
        let levels = LevelDetector::new(&self.config).detect(data);
        let patterns = PatternRecognizer::from_config(&self.config).scan(data);
        let pattern_statistics = PatternRecognizer::statistics(&patterns);
        let score = ScoreAggregator::evaluate(&series, &indicators, &levels, &self.config);

        let divergences = series
            .column("RSI")
            .map(|rsi| rsi_divergences(&data.close, rsi))
            .unwrap_or_default();
        let risk = risk_metrics(&data.close, self.config.risk_free_rate);

        let report = AnalysisReport {
            symbol: data.symbol.clone(),
            interval: data.interval.clone(),
            as_of: data.last_time().ok_or(AnalysisError::NoData)?,
            current_price: data.last_close().ok_or(AnalysisError::NoData)?,
            indicators,
            levels,
            patterns,
            pattern_statistics,
            score,
            risk,
            divergences,
        };

        info!(
            symbol = %report.symbol,
            candles = data.len(),
            patterns = report.patterns.len(),
            sentiment = %report.score.sentiment,
            "analysis run complete"
        );
        Ok(report)
    }

    /// Indicator columns and snapshot only.
    pub fn indicators(
        &self,
        data: &CandleData,
    ) -> Result<(Series, IndicatorSnapshot), AnalysisError> {
        IndicatorEngine::compute(data, &self.config)
    }

    /// Fibonacci and support/resistance levels only.
    pub fn levels(&self, data: &CandleData) -> LevelSet {
        LevelDetector::new(&self.config).detect(data)
    }

    /// Pattern scan and its aggregate statistics only.
    pub fn patterns(&self, data: &CandleData) -> (Vec<Pattern>, PatternStatistics) {
        let hits = PatternRecognizer::from_config(&self.config).scan(data);
        let statistics = PatternRecognizer::statistics(&hits);
        (hits, statistics)
    }
}

/// Analyze several independent series in parallel. Failures are reported
/// per symbol and do not abort the batch.
pub fn analyze_many(
    analyzer: &Analyzer,
    inputs: &[CandleData],
) -> (Vec<AnalysisReport>, Vec<(String, AnalysisError)>) {
    let results: Vec<Result<AnalysisReport, (String, AnalysisError)>> = inputs
        .par_iter()
        .map(|data| {
            analyzer
                .analyze(data)
                .map_err(|error| (data.symbol.clone(), error))
        })
        .collect();

    let mut reports = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(error) => errors.push(error),
        }
    }
    (reports, errors)
}
