//! End-to-end scenarios over the public analysis API.

use chrono::{TimeZone, Utc};
use index_analyzer::data::models::{Candle, CandleData};
use index_analyzer::data::provider::parse_csv;
use index_analyzer::{AnalysisError, Analyzer};

fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        time: Utc.timestamp_opt(i as i64 * 86_400, 0).unwrap(),
        open,
        high,
        low,
        close,
        volume: 1_000.0,
    }
}

fn flat_series(n: usize) -> CandleData {
    CandleData::from_candles(
        "FLAT",
        "1d",
        (0..n).map(|i| candle(i, 50.0, 50.0, 50.0, 50.0)),
    )
}

#[test]
fn empty_input_reports_no_data() {
    let analyzer = Analyzer::default();
    let result = analyzer.analyze(&CandleData::new("NONE", "1d"));
    assert!(matches!(result, Err(AnalysisError::NoData)));
}

#[test]
fn flat_series_survives_every_stage() {
    let analyzer = Analyzer::default();
    let report = analyzer.analyze(&flat_series(60)).unwrap();

    // RSI stays defined and neutral, nothing divides by zero
    assert_eq!(report.indicators.rsi, Some(50.0));
    assert_eq!(report.indicators.atr, Some(0.0));
    // min == max == current price, the strict filters drop everything
    assert!(report.levels.support_resistance.support.is_empty());
    assert!(report.levels.support_resistance.resistance.is_empty());
}

#[test]
fn thirteen_candles_never_define_rsi_14() {
    let analyzer = Analyzer::default();
    let data = CandleData::from_candles(
        "SHORT",
        "1d",
        (0..13).map(|i| {
            let base = 100.0 + i as f64;
            candle(i, base, base + 1.0, base - 1.0, base + 0.5)
        }),
    );
    let (series, snapshot) = analyzer.indicators(&data).unwrap();
    assert!(snapshot.rsi.is_none());
    assert!(series.column("RSI").unwrap().iter().all(Option::is_none));
}

#[test]
fn wickless_rally_scenario() {
    // Strictly rising, open == low and close == high, growing bodies
    let data = CandleData::from_candles(
        "RALLY",
        "1d",
        (0..10).map(|i| {
            let open = 100.0 + i as f64 * (2.0 + i as f64 * 0.4);
            let close = open + 2.0 + i as f64 * 0.6;
            candle(i, open, close, open, close)
        }),
    );
    let analyzer = Analyzer::default();
    let (patterns, statistics) = analyzer.patterns(&data);

    assert!(patterns.iter().all(|p| p.name.as_str() != "Doji"));
    assert!(patterns.iter().all(|p| p.name.as_str() != "Hammer"));
    assert!(patterns.iter().all(|p| p.name.as_str() != "Shooting Star"));
    assert!(patterns
        .iter()
        .any(|p| p.name.as_str() == "Three White Soldiers"));
    assert!(statistics.bullish > 0);
}

#[test]
fn local_extrema_land_on_the_correct_side() {
    let mut bars = Vec::new();
    for i in 0..60 {
        let bar = match i {
            18 => (78.0, 80.0, 75.0, 78.0),   // valley
            40 => (122.0, 126.0, 120.0, 122.0), // peak
            _ => (100.0, 101.0, 99.0, 100.0),
        };
        bars.push(candle(i, bar.0, bar.1, bar.2, bar.3));
    }
    let data = CandleData::from_candles("SIDES", "1d", bars);
    let analyzer = Analyzer::default();
    let levels = analyzer.levels(&data);

    let sr = &levels.support_resistance;
    assert!(sr.support.iter().any(|l| l.price == 75.0));
    assert!(sr.resistance.iter().any(|l| l.price == 126.0));
    assert!(sr.support.iter().all(|l| l.price < sr.current_price));
    assert!(sr.resistance.iter().all(|l| l.price > sr.current_price));
}

#[test]
fn csv_roundtrip_through_full_pipeline() {
    let mut csv = String::from("timestamp,open,high,low,close,volume\n");
    for i in 0..90 {
        let base = 100.0 + (i as f64 * 0.3).sin() * 6.0 + i as f64 * 0.15;
        csv.push_str(&format!(
            "{},{:.2},{:.2},{:.2},{:.2},{}\n",
            1_700_000_000 + i * 86_400,
            base,
            base + 2.0,
            base - 2.0,
            base + 0.8,
            5_000 + i * 7
        ));
    }

    let data = parse_csv(&csv, "CSV", "1d").unwrap();
    let analyzer = Analyzer::default();
    let report = analyzer.analyze(&data).unwrap();

    let snapshot = report.to_snapshot();
    assert!(snapshot["score"]["probabilities"]["bullish"].is_number());
    assert!(snapshot["indicators"]["macd"]["histogram"].is_number());
    assert_eq!(snapshot["symbol"], "CSV");
    // warm-up nulls never leak as NaN into the snapshot
    let text = snapshot.to_string();
    assert!(!text.contains("NaN"));
}

#[test]
fn rerunning_the_pipeline_is_bit_identical() {
    let data = CandleData::from_candles(
        "TWICE",
        "1d",
        (0..100).map(|i| {
            let base = 100.0 + (i as f64 * 0.9).cos() * 8.0;
            candle(i, base, base + 2.5, base - 2.5, base + 1.0)
        }),
    );
    let analyzer = Analyzer::default();
    let first = analyzer.analyze(&data).unwrap();
    let second = analyzer.analyze(&data).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.to_snapshot().to_string(),
        second.to_snapshot().to_string()
    );
}
