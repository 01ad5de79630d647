//! Shared candle geometry and the preceding-trend classifier.

use crate::data::models::CandleData;

pub fn body(data: &CandleData, index: usize) -> f64 {
    (data.close[index] - data.open[index]).abs()
}

pub fn range(data: &CandleData, index: usize) -> f64 {
    data.high[index] - data.low[index]
}

pub fn upper_shadow(data: &CandleData, index: usize) -> f64 {
    data.high[index] - data.open[index].max(data.close[index])
}

pub fn lower_shadow(data: &CandleData, index: usize) -> f64 {
    data.open[index].min(data.close[index]) - data.low[index]
}

pub fn is_bullish(data: &CandleData, index: usize) -> bool {
    data.close[index] > data.open[index]
}

pub fn is_bearish(data: &CandleData, index: usize) -> bool {
    data.close[index] < data.open[index]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Sideways,
    /// Not enough history in front of the index to classify.
    Unknown,
}

/// Classifies the short trend leading into a candle by comparing the close
/// `lookback` bars before the index against the close directly before it.
#[derive(Debug, Clone, Copy)]
pub struct TrendClassifier {
    pub lookback: usize,
    pub threshold: f64,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self {
            lookback: 5,
            threshold: 0.02,
        }
    }
}

impl TrendClassifier {
    pub fn classify(&self, data: &CandleData, index: usize) -> Trend {
        if index < self.lookback {
            return Trend::Unknown;
        }
        let start = data.close[index - self.lookback];
        let end = data.close[index - 1];
        if end > start * (1.0 + self.threshold) {
            Trend::Up
        } else if end < start * (1.0 - self.threshold) {
            Trend::Down
        } else {
            Trend::Sideways
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::Candle;
    use chrono::{TimeZone, Utc};

    fn from_closes(closes: &[f64]) -> CandleData {
        let candles = closes.iter().enumerate().map(|(i, &c)| Candle {
            time: Utc.timestamp_opt(i as i64 * 86_400, 0).unwrap(),
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
            volume: 1_000.0,
        });
        CandleData::from_candles("TEST", "1d", candles)
    }

    #[test]
    fn trend_is_unknown_without_history() {
        let data = from_closes(&[100.0, 101.0, 102.0]);
        let classifier = TrendClassifier::default();
        assert_eq!(classifier.classify(&data, 2), Trend::Unknown);
    }

    #[test]
    fn trend_thresholds() {
        let classifier = TrendClassifier::default();
        let up = from_closes(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        assert_eq!(classifier.classify(&up, 5), Trend::Up);
        let down = from_closes(&[100.0, 99.0, 98.0, 97.0, 96.0, 95.0]);
        assert_eq!(classifier.classify(&down, 5), Trend::Down);
        let flat = from_closes(&[100.0, 100.5, 100.2, 100.8, 100.1, 100.4]);
        assert_eq!(classifier.classify(&flat, 5), Trend::Sideways);
    }

    #[test]
    fn shadows_on_a_wickless_candle() {
        let mut data = CandleData::new("TEST", "1d");
        data.push(Candle {
            time: Utc.timestamp_opt(0, 0).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 100.0,
            close: 105.0,
            volume: 1.0,
        });
        assert_eq!(upper_shadow(&data, 0), 0.0);
        assert_eq!(lower_shadow(&data, 0), 0.0);
        assert_eq!(body(&data, 0), 5.0);
    }
}
