use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// A single OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Column-oriented candle series for a symbol/interval pair.
///
/// All vectors are kept aligned; `push` is the only way rows are added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleData {
    pub symbol: String,
    pub interval: String,
    pub time: Vec<DateTime<Utc>>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl CandleData {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            ..Default::default()
        }
    }

    pub fn from_candles(
        symbol: impl Into<String>,
        interval: impl Into<String>,
        candles: impl IntoIterator<Item = Candle>,
    ) -> Self {
        let mut data = Self::new(symbol, interval);
        for candle in candles {
            data.push(candle);
        }
        data
    }

    pub fn push(&mut self, candle: Candle) {
        self.time.push(candle.time);
        self.open.push(candle.open);
        self.high.push(candle.high);
        self.low.push(candle.low);
        self.close.push(candle.close);
        self.volume.push(candle.volume);
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Close of the most recent candle.
    pub fn last_close(&self) -> Option<f64> {
        self.close.last().copied()
    }

    pub fn last_time(&self) -> Option<DateTime<Utc>> {
        self.time.last().copied()
    }

    /// Structural validation: finite values, high/low ordering, strictly
    /// increasing timestamps.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for i in 0..self.len() {
            let values = [
                self.open[i],
                self.high[i],
                self.low[i],
                self.close[i],
                self.volume[i],
            ];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(AnalysisError::InvalidCandle {
                    index: i,
                    reason: "non-finite value",
                });
            }
            if self.high[i] < self.low[i] {
                return Err(AnalysisError::InvalidCandle {
                    index: i,
                    reason: "high below low",
                });
            }
            if i > 0 && self.time[i] <= self.time[i - 1] {
                return Err(AnalysisError::InvalidCandle {
                    index: i,
                    reason: "timestamp not strictly increasing",
                });
            }
        }
        Ok(())
    }
}

/// Candle series plus the indicator columns computed from it.
///
/// Columns are aligned to the candle count; warm-up slots hold `None`.
/// The map is ordered so serialized output is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub candles: CandleData,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl Series {
    pub fn new(candles: CandleData) -> Self {
        Self {
            candles,
            columns: BTreeMap::new(),
        }
    }

    /// Attach a computed column. Panics if the column length does not match
    /// the candle count; indicator functions always return aligned output,
    /// so a mismatch is a programming error.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        assert_eq!(
            values.len(),
            self.candles.len(),
            "indicator column must be aligned with candles"
        );
        self.columns.insert(name.into(), values);
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Most recent value of a column, if the column exists and the value is
    /// defined.
    pub fn last_value(&self, name: &str) -> Option<f64> {
        self.columns.get(name).and_then(|c| c.last().copied()).flatten()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
