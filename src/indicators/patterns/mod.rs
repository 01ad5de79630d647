//! Candlestick pattern recognition.
//!
//! Each formation is a detector object with a uniform
//! `evaluate(window) -> Option<Pattern>` surface; the recognizer owns the
//! ordered registry and scans the whole series with it. New formations are
//! added by implementing [`PatternDetector`] and registering the detector,
//! without touching any dispatcher.

mod double_candle;
mod five_candle;
mod recognizer;
mod single_candle;
mod triple_candle;
mod utils;

use std::fmt;

use serde::{Serialize, Serializer};

use crate::data::models::CandleData;

pub use recognizer::{PatternRecognizer, PatternStatistics};
pub use utils::{Trend, TrendClassifier};

/// The recognized formations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternName {
    Doji,
    Hammer,
    HangingMan,
    ShootingStar,
    InvertedHammer,
    SpinningTop,
    BullishMarubozu,
    BearishMarubozu,
    LongLeggedDoji,
    DragonflyDoji,
    GravestoneDoji,
    BullishEngulfing,
    BearishEngulfing,
    BullishHarami,
    BearishHarami,
    PiercingLine,
    DarkCloudCover,
    TweezerTop,
    TweezerBottom,
    MorningStar,
    EveningStar,
    ThreeWhiteSoldiers,
    ThreeBlackCrows,
    ThreeInsideUp,
    ThreeInsideDown,
    ThreeOutsideUp,
    ThreeOutsideDown,
    RisingThreeMethods,
    FallingThreeMethods,
}

impl PatternName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doji => "Doji",
            Self::Hammer => "Hammer",
            Self::HangingMan => "Hanging Man",
            Self::ShootingStar => "Shooting Star",
            Self::InvertedHammer => "Inverted Hammer",
            Self::SpinningTop => "Spinning Top",
            Self::BullishMarubozu => "Bullish Marubozu",
            Self::BearishMarubozu => "Bearish Marubozu",
            Self::LongLeggedDoji => "Long-Legged Doji",
            Self::DragonflyDoji => "Dragonfly Doji",
            Self::GravestoneDoji => "Gravestone Doji",
            Self::BullishEngulfing => "Bullish Engulfing",
            Self::BearishEngulfing => "Bearish Engulfing",
            Self::BullishHarami => "Bullish Harami",
            Self::BearishHarami => "Bearish Harami",
            Self::PiercingLine => "Piercing Line",
            Self::DarkCloudCover => "Dark Cloud Cover",
            Self::TweezerTop => "Tweezer Top",
            Self::TweezerBottom => "Tweezer Bottom",
            Self::MorningStar => "Morning Star",
            Self::EveningStar => "Evening Star",
            Self::ThreeWhiteSoldiers => "Three White Soldiers",
            Self::ThreeBlackCrows => "Three Black Crows",
            Self::ThreeInsideUp => "Three Inside Up",
            Self::ThreeInsideDown => "Three Inside Down",
            Self::ThreeOutsideUp => "Three Outside Up",
            Self::ThreeOutsideDown => "Three Outside Down",
            Self::RisingThreeMethods => "Rising Three Methods",
            Self::FallingThreeMethods => "Falling Three Methods",
        }
    }
}

impl fmt::Display for PatternName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PatternName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Directional meaning of a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    BullishReversal,
    BearishReversal,
    BullishContinuation,
    BearishContinuation,
    Indecision,
    StrongBullish,
    StrongBearish,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BullishReversal => "Bullish Reversal",
            Self::BearishReversal => "Bearish Reversal",
            Self::BullishContinuation => "Bullish Continuation",
            Self::BearishContinuation => "Bearish Continuation",
            Self::Indecision => "Indecision",
            Self::StrongBullish => "Strong Bullish",
            Self::StrongBearish => "Strong Bearish",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(
            self,
            Self::BullishReversal | Self::BullishContinuation | Self::StrongBullish
        )
    }

    pub fn is_bearish(&self) -> bool {
        matches!(
            self,
            Self::BearishReversal | Self::BearishContinuation | Self::StrongBearish
        )
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Indecision)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Ordinal confidence attached to a detection. The derived ordering is the
/// documented overlap priority: `VeryHigh > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reliability {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Reliability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Reliability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One detected formation. Immutable once created; several patterns may
/// share an index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub index: usize,
    pub name: PatternName,
    pub signal: Signal,
    pub reliability: Reliability,
    pub description: &'static str,
    /// Close of the candle completing the formation.
    pub price: f64,
}

/// A single formation detector. `min_candles` is the window the geometric
/// predicates need; `evaluate` is only called with indices that leave the
/// full window in range.
pub trait PatternDetector: Send + Sync {
    fn min_candles(&self) -> usize;
    fn evaluate(
        &self,
        data: &CandleData,
        index: usize,
        trend: &TrendClassifier,
    ) -> Option<Pattern>;
}
