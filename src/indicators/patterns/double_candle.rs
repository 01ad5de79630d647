//! Two-candle formations.

use crate::data::models::CandleData;
use crate::indicators::patterns::utils::*;
use crate::indicators::patterns::{
    Pattern, PatternDetector, PatternName, Reliability, Signal,
};

fn hit(
    data: &CandleData,
    index: usize,
    name: PatternName,
    signal: Signal,
    reliability: Reliability,
    description: &'static str,
) -> Option<Pattern> {
    Some(Pattern {
        index,
        name,
        signal,
        reliability,
        description,
        price: data.close[index],
    })
}

/// Current body swallows the previous candle's body, against the trend.
pub struct Engulfing;

impl PatternDetector for Engulfing {
    fn min_candles(&self) -> usize {
        2
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        if is_bearish(data, index - 1)
            && is_bullish(data, index)
            && data.open[index] < data.close[index - 1]
            && data.close[index] > data.open[index - 1]
            && trend.classify(data, index) == Trend::Down
        {
            return hit(
                data,
                index,
                PatternName::BullishEngulfing,
                Signal::BullishReversal,
                Reliability::High,
                "Strong bullish reversal pattern",
            );
        }
        if is_bullish(data, index - 1)
            && is_bearish(data, index)
            && data.open[index] > data.close[index - 1]
            && data.close[index] < data.open[index - 1]
            && trend.classify(data, index) == Trend::Up
        {
            return hit(
                data,
                index,
                PatternName::BearishEngulfing,
                Signal::BearishReversal,
                Reliability::High,
                "Strong bearish reversal pattern",
            );
        }
        None
    }
}

/// Small counter-candle contained inside the previous body.
pub struct Harami;

impl PatternDetector for Harami {
    fn min_candles(&self) -> usize {
        2
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        if is_bearish(data, index - 1)
            && is_bullish(data, index)
            && data.open[index] > data.close[index - 1]
            && data.close[index] < data.open[index - 1]
            && trend.classify(data, index) == Trend::Down
        {
            return hit(
                data,
                index,
                PatternName::BullishHarami,
                Signal::BullishReversal,
                Reliability::Medium,
                "Possible bullish reversal",
            );
        }
        if is_bullish(data, index - 1)
            && is_bearish(data, index)
            && data.open[index] < data.close[index - 1]
            && data.close[index] > data.open[index - 1]
            && trend.classify(data, index) == Trend::Up
        {
            return hit(
                data,
                index,
                PatternName::BearishHarami,
                Signal::BearishReversal,
                Reliability::Medium,
                "Possible bearish reversal",
            );
        }
        None
    }
}

/// Gap below the previous low, then a close past the previous midpoint.
pub struct PiercingLine;

impl PatternDetector for PiercingLine {
    fn min_candles(&self) -> usize {
        2
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let midpoint = (data.open[index - 1] + data.close[index - 1]) / 2.0;
        if is_bearish(data, index - 1)
            && is_bullish(data, index)
            && data.open[index] < data.low[index - 1]
            && data.close[index] > midpoint
            && data.close[index] < data.open[index - 1]
            && trend.classify(data, index) == Trend::Down
        {
            return hit(
                data,
                index,
                PatternName::PiercingLine,
                Signal::BullishReversal,
                Reliability::High,
                "Strong bullish reversal signal",
            );
        }
        None
    }
}

/// Gap above the previous high, then a close below the previous midpoint.
pub struct DarkCloudCover;

impl PatternDetector for DarkCloudCover {
    fn min_candles(&self) -> usize {
        2
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let midpoint = (data.open[index - 1] + data.close[index - 1]) / 2.0;
        if is_bullish(data, index - 1)
            && is_bearish(data, index)
            && data.open[index] > data.high[index - 1]
            && data.close[index] < midpoint
            && data.close[index] > data.open[index - 1]
            && trend.classify(data, index) == Trend::Up
        {
            return hit(
                data,
                index,
                PatternName::DarkCloudCover,
                Signal::BearishReversal,
                Reliability::High,
                "Strong bearish reversal signal",
            );
        }
        None
    }
}

/// Matching highs at a top, or matching lows at a bottom, within 0.1%.
pub struct Tweezer;

impl PatternDetector for Tweezer {
    fn min_candles(&self) -> usize {
        2
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        if (data.high[index] - data.high[index - 1]).abs() < data.high[index] * 0.001
            && trend.classify(data, index) == Trend::Up
        {
            return hit(
                data,
                index,
                PatternName::TweezerTop,
                Signal::BearishReversal,
                Reliability::Medium,
                "Double resistance, possible reversal",
            );
        }
        if (data.low[index] - data.low[index - 1]).abs() < data.low[index] * 0.001
            && trend.classify(data, index) == Trend::Down
        {
            return hit(
                data,
                index,
                PatternName::TweezerBottom,
                Signal::BullishReversal,
                Reliability::Medium,
                "Double support, possible reversal",
            );
        }
        None
    }
}
