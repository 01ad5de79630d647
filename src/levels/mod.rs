//! Price level detection: Fibonacci retracements/extensions and local
//! support/resistance.

use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::data::models::CandleData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LevelKind {
    Support,
    Resistance,
    FibRetracement,
    FibExtension,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    pub price: f64,
    pub kind: LevelKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibonacciLevels {
    pub high: f64,
    pub low: f64,
    pub retracement: Vec<Level>,
    pub extension: Vec<Level>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupportResistance {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
    pub current_price: f64,
}

/// Everything the level detector produces for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSet {
    pub fibonacci: Option<FibonacciLevels>,
    pub support_resistance: SupportResistance,
}

pub struct LevelDetector<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> LevelDetector<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, data: &CandleData) -> LevelSet {
        LevelSet {
            fibonacci: self.fibonacci(data),
            support_resistance: self.support_resistance(data),
        }
    }

    /// Fibonacci levels from the window extremes: retracements measured
    /// down from the high, extensions projected above it.
    pub fn fibonacci(&self, data: &CandleData) -> Option<FibonacciLevels> {
        if data.is_empty() {
            return None;
        }
        let high = data.high.iter().copied().fold(f64::MIN, f64::max);
        let low = data.low.iter().copied().fold(f64::MAX, f64::min);
        let range = high - low;

        let retracement = self
            .config
            .retracement_ratios
            .iter()
            .map(|&ratio| Level {
                price: high - range * ratio,
                kind: LevelKind::FibRetracement,
                label: ratio_label(ratio),
            })
            .collect();

        let extension = self
            .config
            .extension_ratios
            .iter()
            .map(|&ratio| Level {
                price: high + range * (ratio - 1.0),
                kind: LevelKind::FibExtension,
                label: ratio_label(ratio),
            })
            .collect();

        Some(FibonacciLevels {
            high,
            low,
            retracement,
            extension,
        })
    }

    /// Local extrema of Low/High over a centered rolling window, filtered
    /// to distinct values strictly on the correct side of the current
    /// price. At most `sr_max_levels` per side survive: the closest
    /// supports from below and the closest resistances from above.
    pub fn support_resistance(&self, data: &CandleData) -> SupportResistance {
        let Some(current_price) = data.last_close() else {
            return SupportResistance::default();
        };

        let window = self.config.sr_window;
        let max_levels = self.config.sr_max_levels;

        let mut support: Vec<f64> =
            centered_extrema(&data.low, window, Extremum::Min)
                .into_iter()
                .filter(|&level| level < current_price)
                .collect();
        let mut resistance: Vec<f64> =
            centered_extrema(&data.high, window, Extremum::Max)
                .into_iter()
                .filter(|&level| level > current_price)
                .collect();

        support.sort_by(f64::total_cmp);
        resistance.sort_by(f64::total_cmp);
        // Keep the values nearest to price: highest supports, lowest
        // resistances
        if support.len() > max_levels {
            support.drain(..support.len() - max_levels);
        }
        resistance.truncate(max_levels);

        debug!(
            supports = support.len(),
            resistances = resistance.len(),
            current_price,
            "support/resistance detection complete"
        );

        SupportResistance {
            support: support
                .into_iter()
                .map(|price| Level {
                    price,
                    kind: LevelKind::Support,
                    label: "Key Support".to_string(),
                })
                .collect(),
            resistance: resistance
                .into_iter()
                .map(|price| Level {
                    price,
                    kind: LevelKind::Resistance,
                    label: "Key Resistance".to_string(),
                })
                .collect(),
            current_price,
        }
    }
}

fn ratio_label(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

enum Extremum {
    Min,
    Max,
}

/// Distinct values that are the extremum of their centered window. The
/// window spans `[i - w/2, i + w - 1 - w/2]` and must fit entirely inside
/// the series, so edge bars never qualify.
fn centered_extrema(values: &[f64], window: usize, kind: Extremum) -> Vec<f64> {
    let n = values.len();
    if window == 0 || n < window {
        return Vec::new();
    }
    let before = window / 2;
    let after = window - 1 - before;

    let mut found: Vec<f64> = Vec::new();
    for i in before..n - after {
        let slice = &values[i - before..=i + after];
        let extremum = match kind {
            Extremum::Min => slice.iter().copied().fold(f64::MAX, f64::min),
            Extremum::Max => slice.iter().copied().fold(f64::MIN, f64::max),
        };
        if values[i] == extremum && !found.contains(&values[i]) {
            found.push(values[i]);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::Candle;
    use chrono::{TimeZone, Utc};

    fn make_data(bars: &[(f64, f64, f64, f64)]) -> CandleData {
        let candles = bars.iter().enumerate().map(|(i, &(o, h, l, c))| Candle {
            time: Utc.timestamp_opt(i as i64 * 86_400, 0).unwrap(),
            open: o,
            high: h,
            low: l,
            close: c,
            volume: 1_000.0,
        });
        CandleData::from_candles("TEST", "1d", candles)
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    #[test]
    fn fibonacci_levels_bracket_the_range() {
        let data = make_data(&[(100.0, 120.0, 80.0, 110.0), (110.0, 115.0, 100.0, 105.0)]);
        let config = config();
        let fib = LevelDetector::new(&config).fibonacci(&data).unwrap();
        assert_eq!(fib.high, 120.0);
        assert_eq!(fib.low, 80.0);
        // 61.8% retracement: 120 − 40·0.618
        let level = fib
            .retracement
            .iter()
            .find(|l| l.label == "61.8%")
            .unwrap();
        assert!((level.price - 95.28).abs() < 1e-9);
        // extensions sit above the high
        assert!(fib.extension.iter().all(|l| l.price > fib.high));
    }

    #[test]
    fn empty_series_yields_no_levels() {
        let config = config();
        let detector = LevelDetector::new(&config);
        let data = CandleData::new("TEST", "1d");
        assert!(detector.fibonacci(&data).is_none());
        let sr = detector.support_resistance(&data);
        assert!(sr.support.is_empty() && sr.resistance.is_empty());
    }

    #[test]
    fn flat_series_has_no_sides() {
        // min == max == current price, and the filters are strict
        let data = make_data(&vec![(50.0, 50.0, 50.0, 50.0); 40]);
        let config = config();
        let sr = LevelDetector::new(&config).support_resistance(&data);
        assert!(sr.support.is_empty());
        assert!(sr.resistance.is_empty());
    }

    #[test]
    fn extrema_split_around_current_price() {
        // A valley at 80 and a peak at 130, with the series ending at 100:
        // the valley must land in support, the peak in resistance, never
        // both.
        let mut bars = Vec::new();
        for i in 0..50 {
            let base = match i {
                15 => (82.0, 84.0, 80.0, 82.0),
                35 => (126.0, 130.0, 124.0, 126.0),
                _ => (100.0, 101.0, 99.0, 100.0),
            };
            bars.push(base);
        }
        let data = make_data(&bars);
        let config = config();
        let sr = LevelDetector::new(&config).support_resistance(&data);
        assert!(sr.support.iter().any(|l| l.price == 80.0));
        assert!(sr.resistance.iter().any(|l| l.price == 130.0));
        assert!(sr.support.iter().all(|l| l.price < sr.current_price));
        assert!(sr.resistance.iter().all(|l| l.price > sr.current_price));
    }

    #[test]
    fn keeps_only_the_closest_levels() {
        // Seven distinct valleys below the final price; only the five
        // highest (closest from below) survive.
        let mut bars: Vec<(f64, f64, f64, f64)> = Vec::new();
        for i in 0..200 {
            let bar = if i % 25 == 12 {
                let depth = 60.0 + (i / 25) as f64 * 2.0;
                (depth + 2.0, depth + 3.0, depth, depth + 2.0)
            } else {
                (100.0, 101.0, 99.0, 100.0)
            };
            bars.push(bar);
        }
        let data = make_data(&bars);
        let config = config();
        let sr = LevelDetector::new(&config).support_resistance(&data);
        assert!(sr.support.len() <= config.sr_max_levels);
        assert!(sr.support.windows(2).all(|w| w[0].price <= w[1].price));
    }
}
