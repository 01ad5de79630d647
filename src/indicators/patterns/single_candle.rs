//! Single-candle formations.

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

/// Body under 10% of the range. The signal flips with the preceding trend.
pub struct Doji;

impl PatternDetector for Doji {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let range = range(data, index);
        if range <= 0.0 || body(data, index) / range >= 0.1 {
            return None;
        }
        let signal = match trend.classify(data, index) {
            Trend::Up => Signal::BearishReversal,
            Trend::Down => Signal::BullishReversal,
            _ => Signal::Indecision,
        };
        hit(
            data,
            index,
            PatternName::Doji,
            signal,
            Reliability::Medium,
            "Market indecision, possible trend reversal",
        )
    }
}

/// Long lower shadow, tiny upper shadow, after a downtrend.
pub struct Hammer;

impl PatternDetector for Hammer {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let body = body(data, index);
        if lower_shadow(data, index) > body * 2.0
            && upper_shadow(data, index) < body * 0.3
            && trend.classify(data, index) == Trend::Down
        {
            return hit(
                data,
                index,
                PatternName::Hammer,
                Signal::BullishReversal,
                Reliability::High,
                "Strong bullish reversal signal after a downtrend",
            );
        }
        None
    }
}

/// Hammer geometry after an uptrend.
pub struct HangingMan;

impl PatternDetector for HangingMan {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let body = body(data, index);
        if lower_shadow(data, index) > body * 2.0
            && upper_shadow(data, index) < body * 0.3
            && trend.classify(data, index) == Trend::Up
        {
            return hit(
                data,
                index,
                PatternName::HangingMan,
                Signal::BearishReversal,
                Reliability::Medium,
                "Possible bearish reversal signal after an uptrend",
            );
        }
        None
    }
}

/// Long upper shadow, tiny lower shadow, after an uptrend.
pub struct ShootingStar;

impl PatternDetector for ShootingStar {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let body = body(data, index);
        if upper_shadow(data, index) > body * 2.0
            && lower_shadow(data, index) < body * 0.3
            && trend.classify(data, index) == Trend::Up
        {
            return hit(
                data,
                index,
                PatternName::ShootingStar,
                Signal::BearishReversal,
                Reliability::High,
                "Strong bearish reversal signal after an uptrend",
            );
        }
        None
    }
}

/// Shooting-star geometry after a downtrend.
pub struct InvertedHammer;

impl PatternDetector for InvertedHammer {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let body = body(data, index);
        if upper_shadow(data, index) > body * 2.0
            && lower_shadow(data, index) < body * 0.3
            && trend.classify(data, index) == Trend::Down
        {
            return hit(
                data,
                index,
                PatternName::InvertedHammer,
                Signal::BullishReversal,
                Reliability::Medium,
                "Possible bullish reversal signal after a downtrend",
            );
        }
        None
    }
}

/// Small body with substantial shadows on both sides.
pub struct SpinningTop;

impl PatternDetector for SpinningTop {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, _trend: &TrendClassifier) -> Option<Pattern> {
        let range = range(data, index);
        if range <= 0.0 {
            return None;
        }
        let body = body(data, index);
        if body / range < 0.3 && upper_shadow(data, index) > body && lower_shadow(data, index) > body
        {
            return hit(
                data,
                index,
                PatternName::SpinningTop,
                Signal::Indecision,
                Reliability::Low,
                "Indecision, possible consolidation",
            );
        }
        None
    }
}

/// Body covering more than 95% of the range.
pub struct Marubozu;

impl PatternDetector for Marubozu {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, _trend: &TrendClassifier) -> Option<Pattern> {
        let range = range(data, index);
        if range <= 0.0 || body(data, index) / range <= 0.95 {
            return None;
        }
        if is_bullish(data, index) {
            hit(
                data,
                index,
                PatternName::BullishMarubozu,
                Signal::StrongBullish,
                Reliability::High,
                "Very strong bullish signal, buyers in control",
            )
        } else {
            hit(
                data,
                index,
                PatternName::BearishMarubozu,
                Signal::StrongBearish,
                Reliability::High,
                "Very strong bearish signal, sellers in control",
            )
        }
    }
}

/// Doji with shadows at least five bodies long on both sides.
pub struct LongLeggedDoji;

impl PatternDetector for LongLeggedDoji {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, _trend: &TrendClassifier) -> Option<Pattern> {
        let range = range(data, index);
        if range <= 0.0 {
            return None;
        }
        let body = body(data, index);
        if body / range < 0.05
            && upper_shadow(data, index) > body * 5.0
            && lower_shadow(data, index) > body * 5.0
        {
            return hit(
                data,
                index,
                PatternName::LongLeggedDoji,
                Signal::Indecision,
                Reliability::Medium,
                "Extreme indecision, possible major turning point",
            );
        }
        None
    }
}

/// Doji whose range hangs almost entirely below the body.
pub struct DragonflyDoji;

impl PatternDetector for DragonflyDoji {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let range = range(data, index);
        if range <= 0.0 {
            return None;
        }
        if body(data, index) / range < 0.05
            && lower_shadow(data, index) > range * 0.7
            && upper_shadow(data, index) < range * 0.1
        {
            return if trend.classify(data, index) == Trend::Down {
                hit(
                    data,
                    index,
                    PatternName::DragonflyDoji,
                    Signal::BullishReversal,
                    Reliability::High,
                    "Strong bullish reversal signal at the bottom",
                )
            } else {
                hit(
                    data,
                    index,
                    PatternName::DragonflyDoji,
                    Signal::Indecision,
                    Reliability::Medium,
                    "Support found",
                )
            };
        }
        None
    }
}

/// Doji whose range towers almost entirely above the body.
pub struct GravestoneDoji;

impl PatternDetector for GravestoneDoji {
    fn min_candles(&self) -> usize {
        1
    }

    fn evaluate(&self, data: &CandleData, index: usize, trend: &TrendClassifier) -> Option<Pattern> {
        let range = range(data, index);
        if range <= 0.0 {
            return None;
        }
        if body(data, index) / range < 0.05
            && upper_shadow(data, index) > range * 0.7
            && lower_shadow(data, index) < range * 0.1
        {
            return if trend.classify(data, index) == Trend::Up {
                hit(
                    data,
                    index,
                    PatternName::GravestoneDoji,
                    Signal::BearishReversal,
                    Reliability::High,
                    "Strong bearish reversal signal at the top",
                )
            } else {
                hit(
                    data,
                    index,
                    PatternName::GravestoneDoji,
                    Signal::Indecision,
                    Reliability::Medium,
                    "Resistance found",
                )
            };
        }
        None
    }
}
