pub mod divergence;
pub mod engine;
pub mod oscillators;
pub mod overlaps;
pub mod patterns;
pub mod pivots;
pub mod volatility;
pub mod volume;

pub use self::divergence::{rsi_divergences, Divergence, DivergenceKind};
pub use self::engine::{
    AdxSnapshot, BollingerSnapshot, IndicatorEngine, IndicatorSnapshot, MacdSnapshot,
    MovingAverageSnapshot, StochasticSnapshot,
};
pub use self::pivots::PivotPoints;
