//! Five-candle continuation formations.

use crate::data::models::CandleData;
use crate::indicators::patterns::utils::*;
use crate::indicators::patterns::{
    Pattern, PatternDetector, PatternName, Reliability, Signal,
};

/// Rising/Falling Three Methods: a long candle, three small candles held
/// inside its range, then a continuation candle closing beyond the first
/// one's close.
pub struct ThreeMethods;

impl PatternDetector for ThreeMethods {
    fn min_candles(&self) -> usize {
        5
    }

    fn evaluate(&self, data: &CandleData, index: usize, _trend: &TrendClassifier) -> Option<Pattern> {
        let first = index - 4;
        let first_body = body(data, first);
        let small_middle = (1..=3).all(|offset| first_body > body(data, first + offset));
        let contained = (first + 1..index).all(|j| {
            data.close[j] < data.high[first] && data.close[j] > data.low[first]
        });

        if is_bullish(data, first)
            && small_middle
            && contained
            && is_bullish(data, index)
            && data.close[index] > data.close[first]
        {
            return Some(Pattern {
                index,
                name: PatternName::RisingThreeMethods,
                signal: Signal::BullishContinuation,
                reliability: Reliability::High,
                description: "Bullish trend continuation",
                price: data.close[index],
            });
        }
        if is_bearish(data, first)
            && small_middle
            && contained
            && is_bearish(data, index)
            && data.close[index] < data.close[first]
        {
            return Some(Pattern {
                index,
                name: PatternName::FallingThreeMethods,
                signal: Signal::BearishContinuation,
                reliability: Reliability::High,
                description: "Bearish trend continuation",
                price: data.close[index],
            });
        }
        None
    }
}
