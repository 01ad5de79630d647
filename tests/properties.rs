//! Randomized properties over the public API.

use chrono::{TimeZone, Utc};
use index_analyzer::config::AnalysisConfig;
use index_analyzer::data::models::{Candle, CandleData};
use index_analyzer::levels::LevelDetector;
use index_analyzer::Analyzer;
use proptest::prelude::*;

fn candle_data() -> impl Strategy<Value = CandleData> {
    prop::collection::vec(
        (
            10.0f64..500.0, // open
            10.0f64..500.0, // close
            0.0f64..5.0,    // upper wick
            0.0f64..5.0,    // lower wick
            1.0f64..10_000.0,
        ),
        1..150,
    )
    .prop_map(|bars| {
        let candles = bars
            .into_iter()
            .enumerate()
            .map(|(i, (open, close, up, down, volume))| Candle {
                time: Utc.timestamp_opt(i as i64 * 86_400, 0).unwrap(),
                open,
                high: open.max(close) + up,
                low: open.min(close) - down,
                close,
                volume,
            });
        CandleData::from_candles("PROP", "1d", candles)
    })
}

proptest! {
    #[test]
    fn supports_stay_below_and_resistances_above(data in candle_data()) {
        let config = AnalysisConfig::default();
        let sr = LevelDetector::new(&config).support_resistance(&data);
        let current = data.last_close().unwrap();
        prop_assert!(sr.support.iter().all(|l| l.price < current));
        prop_assert!(sr.resistance.iter().all(|l| l.price > current));
        prop_assert!(sr.support.len() <= config.sr_max_levels);
        prop_assert!(sr.resistance.len() <= config.sr_max_levels);
    }

    #[test]
    fn probabilities_sum_to_one_hundred(data in candle_data()) {
        let report = Analyzer::default().analyze(&data).unwrap();
        let p = &report.score.probabilities;
        prop_assert!((p.bullish + p.bearish + p.neutral - 100.0).abs() <= 0.011,
            "sum was {}", p.bullish + p.bearish + p.neutral);
        prop_assert!((-100.0..=100.0).contains(&report.score.trend_strength));
    }

    #[test]
    fn warmup_regions_are_exactly_null(data in candle_data()) {
        let analyzer = Analyzer::default();
        let (series, _) = analyzer.indicators(&data).unwrap();
        let n = data.len();
        let config = analyzer.config();

        let rsi = series.column("RSI").unwrap();
        for (i, value) in rsi.iter().enumerate() {
            prop_assert_eq!(value.is_some(), i >= config.rsi_period,
                "RSI defined-ness wrong at {} of {}", i, n);
        }

        let bb = series.column("BB_middle").unwrap();
        for (i, value) in bb.iter().enumerate() {
            prop_assert_eq!(value.is_some(), i + 1 >= config.bb_period);
        }

        let atr = series.column("ATR").unwrap();
        for (i, value) in atr.iter().enumerate() {
            prop_assert_eq!(value.is_some(), i >= config.atr_period);
        }
    }

    #[test]
    fn analysis_is_deterministic(data in candle_data()) {
        let analyzer = Analyzer::default();
        let first = analyzer.analyze(&data).unwrap();
        let second = analyzer.analyze(&data).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn pattern_statistics_partition_hits(data in candle_data()) {
        let (patterns, stats) = Analyzer::default().patterns(&data);
        prop_assert_eq!(stats.total, patterns.len());
        prop_assert_eq!(stats.bullish + stats.bearish + stats.neutral, stats.total);
        prop_assert_eq!(stats.by_name.values().sum::<usize>(), stats.total);
    }
}
