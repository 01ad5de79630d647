//! Three-candle formations.

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

/// Bearish candle, small star, then a bullish close past the first
/// candle's midpoint. The trend is measured at the first candle of the
/// window.
pub struct MorningStar;

impl PatternDetector for MorningStar {
    fn min_candles(&self) -> usize {
        3
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let midpoint = (data.open[index - 2] + data.close[index - 2]) / 2.0;
        if is_bearish(data, index - 2)
            && body(data, index - 1) < body(data, index - 2) * 0.3
            && is_bullish(data, index)
            && data.close[index] > midpoint
            && trend.classify(data, index - 2) == Trend::Down
        {
            return hit(
                data,
                index,
                PatternName::MorningStar,
                Signal::BullishReversal,
                Reliability::VeryHigh,
                "Very strong bullish reversal pattern",
            );
        }
        None
    }
}

/// Mirror image of the morning star at a top.
pub struct EveningStar;

impl PatternDetector for EveningStar {
    fn min_candles(&self) -> usize {
        3
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let midpoint = (data.open[index - 2] + data.close[index - 2]) / 2.0;
        if is_bullish(data, index - 2)
            && body(data, index - 1) < body(data, index - 2) * 0.3
            && is_bearish(data, index)
            && data.close[index] < midpoint
            && trend.classify(data, index - 2) == Trend::Up
        {
            return hit(
                data,
                index,
                PatternName::EveningStar,
                Signal::BearishReversal,
                Reliability::VeryHigh,
                "Very strong bearish reversal pattern",
            );
        }
        None
    }
}

/// Three bullish candles with rising opens and rising closes.
pub struct ThreeWhiteSoldiers;

impl PatternDetector for ThreeWhiteSoldiers {
    fn min_candles(&self) -> usize {
        3
    }

    fn evaluate(&self, data: &CandleData, index: usize, _trend: &TrendClassifier) -> Option<Pattern> {
        if is_bullish(data, index - 2)
            && is_bullish(data, index - 1)
            && is_bullish(data, index)
            && data.close[index - 1] > data.close[index - 2]
            && data.close[index] > data.close[index - 1]
            && data.open[index - 1] > data.open[index - 2]
            && data.open[index] > data.open[index - 1]
        {
            return hit(
                data,
                index,
                PatternName::ThreeWhiteSoldiers,
                Signal::StrongBullish,
                Reliability::VeryHigh,
                "Very strong uptrend",
            );
        }
        None
    }
}

/// Three bearish candles with falling opens and falling closes.
pub struct ThreeBlackCrows;

impl PatternDetector for ThreeBlackCrows {
    fn min_candles(&self) -> usize {
        3
    }

    fn evaluate(&self, data: &CandleData, index: usize, _trend: &TrendClassifier) -> Option<Pattern> {
        if is_bearish(data, index - 2)
            && is_bearish(data, index - 1)
            && is_bearish(data, index)
            && data.close[index - 1] < data.close[index - 2]
            && data.close[index] < data.close[index - 1]
            && data.open[index - 1] < data.open[index - 2]
            && data.open[index] < data.open[index - 1]
        {
            return hit(
                data,
                index,
                PatternName::ThreeBlackCrows,
                Signal::StrongBearish,
                Reliability::VeryHigh,
                "Very strong downtrend",
            );
        }
        None
    }
}

/// Harami followed by a confirming third close.
pub struct ThreeInside;

impl PatternDetector for ThreeInside {
    fn min_candles(&self) -> usize {
        3
    }

    fn evaluate(&self, data: &CandleData, index: usize, _trend: &TrendClassifier) -> Option<Pattern> {
        if is_bearish(data, index - 2)
            && is_bullish(data, index - 1)
            && data.close[index - 1] < data.open[index - 2]
            && data.open[index - 1] > data.close[index - 2]
            && is_bullish(data, index)
            && data.close[index] > data.close[index - 1]
        {
            return hit(
                data,
                index,
                PatternName::ThreeInsideUp,
                Signal::BullishReversal,
                Reliability::High,
                "Confirmed bullish reversal",
            );
        }
        if is_bullish(data, index - 2)
            && is_bearish(data, index - 1)
            && data.close[index - 1] > data.open[index - 2]
            && data.open[index - 1] < data.close[index - 2]
            && is_bearish(data, index)
            && data.close[index] < data.close[index - 1]
        {
            return hit(
                data,
                index,
                PatternName::ThreeInsideDown,
                Signal::BearishReversal,
                Reliability::High,
                "Confirmed bearish reversal",
            );
        }
        None
    }
}

/// Engulfing followed by a confirming third close.
pub struct ThreeOutside;

impl PatternDetector for ThreeOutside {
    fn min_candles(&self) -> usize {
        3
    }

    fn evaluate(&self, data: &CandleData, index: usize, _trend: &TrendClassifier) -> Option<Pattern> {
        if is_bearish(data, index - 2)
            && is_bullish(data, index - 1)
            && data.open[index - 1] < data.close[index - 2]
            && data.close[index - 1] > data.open[index - 2]
            && is_bullish(data, index)
            && data.close[index] > data.close[index - 1]
        {
            return hit(
                data,
                index,
                PatternName::ThreeOutsideUp,
                Signal::BullishReversal,
                Reliability::High,
                "Strong bullish reversal with engulfing",
            );
        }
        if is_bullish(data, index - 2)
            && is_bearish(data, index - 1)
            && data.open[index - 1] > data.close[index - 2]
            && data.close[index - 1] < data.open[index - 2]
            && is_bearish(data, index)
            && data.close[index] < data.close[index - 1]
        {
            return hit(
                data,
                index,
                PatternName::ThreeOutsideDown,
                Signal::BearishReversal,
                Reliability::High,
                "Strong bearish reversal with engulfing",
            );
        }
        None
    }
}
