use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::data::models::CandleData;
use crate::indicators::patterns::utils::TrendClassifier;
use crate::indicators::patterns::{
    double_candle, five_candle, single_candle, triple_candle, Pattern, PatternDetector,
};

/// Aggregate view over a scan's hit set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatternStatistics {
    pub total: usize,
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
    /// Hits with High or Very High reliability.
    pub high_reliability: usize,
    pub by_name: BTreeMap<String, usize>,
}

/// Scans a candle series with the full detector registry.
pub struct PatternRecognizer {
    detectors: Vec<Box<dyn PatternDetector>>,
    trend: TrendClassifier,
}

impl PatternRecognizer {
    /// Default registry. Registration order is the documented detection
    /// order and breaks reliability ties in [`Self::primary_at`].
    pub fn new(trend: TrendClassifier) -> Self {
        let detectors: Vec<Box<dyn PatternDetector>> = vec![
            Box::new(single_candle::Doji),
            Box::new(single_candle::Hammer),
            Box::new(single_candle::HangingMan),
            Box::new(single_candle::ShootingStar),
            Box::new(single_candle::InvertedHammer),
            Box::new(single_candle::SpinningTop),
            Box::new(single_candle::Marubozu),
            Box::new(single_candle::LongLeggedDoji),
            Box::new(single_candle::DragonflyDoji),
            Box::new(single_candle::GravestoneDoji),
            Box::new(double_candle::Engulfing),
            Box::new(double_candle::Harami),
            Box::new(double_candle::PiercingLine),
            Box::new(double_candle::DarkCloudCover),
            Box::new(double_candle::Tweezer),
            Box::new(triple_candle::MorningStar),
            Box::new(triple_candle::EveningStar),
            Box::new(triple_candle::ThreeWhiteSoldiers),
            Box::new(triple_candle::ThreeBlackCrows),
            Box::new(triple_candle::ThreeInside),
            Box::new(triple_candle::ThreeOutside),
            Box::new(five_candle::ThreeMethods),
        ];
        Self { detectors, trend }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(TrendClassifier {
            lookback: config.trend_lookback,
            threshold: config.trend_threshold,
        })
    }

    /// Register an additional detector behind the built-in ones.
    pub fn register(&mut self, detector: Box<dyn PatternDetector>) {
        self.detectors.push(detector);
    }

    /// Run every detector over every index with a full window in range and
    /// return the complete hit set, detector-major. At most one hit per
    /// (index, name) pair can occur since each detector yields a single
    /// pattern per index.
    pub fn scan(&self, data: &CandleData) -> Vec<Pattern> {
        let mut hits = Vec::new();
        for detector in &self.detectors {
            let window = detector.min_candles();
            if data.len() < window {
                continue;
            }
            for index in (window - 1)..data.len() {
                if let Some(pattern) = detector.evaluate(data, index, &self.trend) {
                    hits.push(pattern);
                }
            }
        }
        debug!(candles = data.len(), hits = hits.len(), "pattern scan complete");
        hits
    }

    /// The single primary pattern at an index: highest reliability wins,
    /// earlier detection order breaks ties.
    pub fn primary_at<'p>(patterns: &'p [Pattern], index: usize) -> Option<&'p Pattern> {
        let mut primary: Option<&Pattern> = None;
        for pattern in patterns.iter().filter(|p| p.index == index) {
            match primary {
                Some(current) if pattern.reliability <= current.reliability => {}
                _ => primary = Some(pattern),
            }
        }
        primary
    }

    /// Counts over the full hit set, computed once per scan result.
    pub fn statistics(patterns: &[Pattern]) -> PatternStatistics {
        let mut stats = PatternStatistics {
            total: patterns.len(),
            ..Default::default()
        };
        for pattern in patterns {
            if pattern.signal.is_bullish() {
                stats.bullish += 1;
            } else if pattern.signal.is_bearish() {
                stats.bearish += 1;
            } else {
                stats.neutral += 1;
            }
            if pattern.reliability >= super::Reliability::High {
                stats.high_reliability += 1;
            }
            *stats
                .by_name
                .entry(pattern.name.as_str().to_string())
                .or_insert(0) += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::Candle;
    use crate::indicators::patterns::{PatternName, Reliability, Signal};
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

    fn recognizer() -> PatternRecognizer {
        PatternRecognizer::new(TrendClassifier::default())
    }

    fn downtrend_prefix(n: usize) -> Vec<(f64, f64, f64, f64)> {
        (0..n)
            .map(|i| {
                let base = 100.0 - i as f64 * 3.0;
                (base, base + 0.5, base - 3.5, base - 3.0)
            })
            .collect()
    }

    #[test]
    fn doji_without_trend_is_indecision() {
        let data = make_data(&[(100.0, 105.0, 95.0, 100.2)]);
        let hits = recognizer().scan(&data);
        let doji = hits.iter().find(|p| p.name == PatternName::Doji).unwrap();
        assert_eq!(doji.signal, Signal::Indecision);
        assert_eq!(doji.index, 0);
    }

    #[test]
    fn hammer_requires_a_downtrend() {
        // Without trend context the same candle stays silent
        let lone = make_data(&[(100.0, 100.5, 90.0, 100.2)]);
        assert!(recognizer()
            .scan(&lone)
            .iter()
            .all(|p| p.name != PatternName::Hammer));

        let mut bars = downtrend_prefix(6);
        bars.push((82.0, 82.24, 72.0, 82.2)); // long lower shadow at the low
        let hits = recognizer().scan(&make_data(&bars));
        let hammer = hits.iter().find(|p| p.name == PatternName::Hammer).unwrap();
        assert_eq!(hammer.signal, Signal::BullishReversal);
        assert_eq!(hammer.reliability, Reliability::High);
        assert_eq!(hammer.index, 6);
    }

    #[test]
    fn wickless_rally_finds_soldiers_but_no_dojis() {
        // Strictly rising, open == low and close == high on every bar
        let bars: Vec<(f64, f64, f64, f64)> = (0..10)
            .map(|i| {
                let open = 100.0 + i as f64 * (2.0 + i as f64 * 0.3);
                let close = open + 2.0 + i as f64 * 0.5;
                (open, close, open, close)
            })
            .collect();
        let hits = recognizer().scan(&make_data(&bars));
        assert!(hits.iter().all(|p| p.name != PatternName::Doji));
        assert!(hits.iter().all(|p| p.name != PatternName::Hammer));
        assert!(hits.iter().all(|p| p.name != PatternName::ShootingStar));
        assert!(hits
            .iter()
            .any(|p| p.name == PatternName::ThreeWhiteSoldiers));
    }

    #[test]
    fn primary_prefers_higher_reliability() {
        let patterns = vec![
            Pattern {
                index: 7,
                name: PatternName::SpinningTop,
                signal: Signal::Indecision,
                reliability: Reliability::Medium,
                description: "",
                price: 1.0,
            },
            Pattern {
                index: 7,
                name: PatternName::Hammer,
                signal: Signal::BullishReversal,
                reliability: Reliability::High,
                description: "",
                price: 1.0,
            },
        ];
        let primary = PatternRecognizer::primary_at(&patterns, 7).unwrap();
        assert_eq!(primary.name, PatternName::Hammer);
    }

    #[test]
    fn primary_breaks_ties_by_detection_order() {
        let patterns = vec![
            Pattern {
                index: 3,
                name: PatternName::Hammer,
                signal: Signal::BullishReversal,
                reliability: Reliability::High,
                description: "",
                price: 1.0,
            },
            Pattern {
                index: 3,
                name: PatternName::PiercingLine,
                signal: Signal::BullishReversal,
                reliability: Reliability::High,
                description: "",
                price: 1.0,
            },
        ];
        let primary = PatternRecognizer::primary_at(&patterns, 3).unwrap();
        assert_eq!(primary.name, PatternName::Hammer);
    }

    #[test]
    fn statistics_partition_the_hit_set() {
        let mut bars = downtrend_prefix(6);
        bars.push((82.0, 82.5, 72.0, 82.2));
        let hits = recognizer().scan(&make_data(&bars));
        let stats = PatternRecognizer::statistics(&hits);
        assert_eq!(stats.total, hits.len());
        assert_eq!(stats.bullish + stats.bearish + stats.neutral, stats.total);
        assert_eq!(
            stats.by_name.values().sum::<usize>(),
            stats.total,
            "histogram covers every hit"
        );
    }

    #[test]
    fn empty_series_scans_to_nothing() {
        let data = CandleData::new("TEST", "1d");
        assert!(recognizer().scan(&data).is_empty());
    }
}
