//! Multi-factor score aggregation: trend strength, outcome probabilities,
//! sentiment and price targets.
//!
//! The contribution table, vote checklist and evaluation order are load
//! bearing: downstream consumers compare reports across versions, so the
//! exact weights, thresholds and the order of the signal-bias adjustment
//! relative to the neutral override must stay as they are.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::data::models::Series;
use crate::indicators::{IndicatorSnapshot, PivotPoints};
use crate::levels::{FibonacciLevels, LevelSet, SupportResistance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    VeryBullish,
    Bullish,
    Neutral,
    Bearish,
    VeryBearish,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryBullish => "Very Bullish",
            Self::Bullish => "Bullish",
            Self::Neutral => "Neutral",
            Self::Bearish => "Bearish",
            Self::VeryBearish => "Very Bearish",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Vote shares across the indicator checklist, renormalized to sum to 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Probabilities {
    pub bullish: f64,
    pub bearish: f64,
    pub neutral: f64,
    pub bullish_signals: usize,
    pub bearish_signals: usize,
    pub neutral_signals: usize,
    pub total_signals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTarget {
    pub label: String,
    pub price: f64,
    /// Signed percent distance from the current price.
    pub distance_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceTargets {
    pub bullish: Vec<PriceTarget>,
    pub bearish: Vec<PriceTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Composite directional score in [-100, 100].
    pub trend_strength: f64,
    pub sentiment: Sentiment,
    /// The leading contributing factors, in contribution order (capped at
    /// four).
    pub rationale: Vec<String>,
    /// Headline plus rationale and the vote tally, ready for display.
    pub summary: String,
    pub probabilities: Probabilities,
    pub price_targets: PriceTargets,
}

pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn evaluate(
        series: &Series,
        snapshot: &IndicatorSnapshot,
        levels: &LevelSet,
        config: &AnalysisConfig,
    ) -> ScoreResult {
        let (raw_score, reasons) = Self::trend_strength(series, snapshot, config);
        let probabilities = Self::probabilities(series, snapshot, config);

        let mut score = raw_score;
        let mut reasoning = if reasons.is_empty() {
            "No clear signals".to_string()
        } else {
            reasons
                .iter()
                .take(4)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };

        if probabilities.total_signals > 0 {
            let bias = (probabilities.bullish_signals as f64
                - probabilities.bearish_signals as f64)
                / probabilities.total_signals as f64
                * 20.0;
            score = (score + bias).clamp(-100.0, 100.0);
            reasoning = format!(
                "{reasoning} | Signals: {}↑/{}→/{}↓",
                probabilities.bullish_signals,
                probabilities.neutral_signals,
                probabilities.bearish_signals
            );
        }

        let (sentiment, main_reason) = Self::decide_sentiment(score, &probabilities);

        let price_targets = Self::price_targets(
            levels.fibonacci.as_ref(),
            &snapshot.pivots,
            &levels.support_resistance,
            series.candles.last_close(),
        );

        debug!(score, sentiment = %sentiment, "score aggregation complete");

        ScoreResult {
            trend_strength: score,
            sentiment,
            rationale: reasons.into_iter().take(4).collect(),
            summary: format!("{main_reason}: {reasoning}"),
            probabilities,
            price_targets,
        }
    }

    /// Sentiment from the bias-adjusted score. The neutral override reads
    /// that adjusted score together with the vote shares; the adjustment
    /// has to land before this check, not after.
    fn decide_sentiment(
        score: f64,
        probabilities: &Probabilities,
    ) -> (Sentiment, &'static str) {
        if probabilities.neutral_signals as f64 > probabilities.total_signals as f64 * 0.6
            && score.abs() < 15.0
        {
            (Sentiment::Neutral, "High neutrality, consolidation")
        } else if score >= 25.0 {
            (Sentiment::VeryBullish, "Strong upward signals")
        } else if score >= 10.0 {
            (Sentiment::Bullish, "Positive tendency")
        } else if score >= -10.0 {
            (Sentiment::Neutral, "Balanced market")
        } else if score >= -25.0 {
            (Sentiment::Bearish, "Negative tendency")
        } else {
            (Sentiment::VeryBearish, "Strong downward signals")
        }
    }

    /// Weighted trend-strength sum. Any missing input simply contributes
    /// nothing; zero total weight defines the score as 0.
    fn trend_strength(
        series: &Series,
        snapshot: &IndicatorSnapshot,
        config: &AnalysisConfig,
    ) -> (f64, Vec<String>) {
        let mut score = 0.0f64;
        let mut weight = 0.0f64;
        let mut reasons: Vec<String> = Vec::new();

        // Overbought momentum counts as bullish here, not contrarian.
        if let Some(rsi) = snapshot.rsi.filter(|r| *r != 0.0) {
            if rsi > 70.0 {
                score += 2.0;
                weight += 2.0;
                reasons.push(format!("RSI overbought ({rsi:.1})"));
            } else if rsi > 50.0 {
                score += 1.0;
                weight += 1.0;
                reasons.push(format!("RSI bullish ({rsi:.1})"));
            } else if rsi < 30.0 {
                score -= 2.0;
                weight += 2.0;
                reasons.push(format!("RSI oversold ({rsi:.1})"));
            } else {
                score -= 1.0;
                weight += 1.0;
                reasons.push(format!("RSI bearish ({rsi:.1})"));
            }
        }

        if let Some(histogram) = snapshot.macd.histogram {
            if histogram > 0.0 {
                score += 1.5;
                reasons.push(format!("MACD positive ({histogram:.4})"));
            } else {
                score -= 1.5;
                reasons.push(format!("MACD negative ({histogram:.4})"));
            }
            weight += 1.5;
        }

        if let Some(adx) = snapshot.adx.adx.filter(|a| *a != 0.0) {
            if adx > 25.0 {
                let di_plus = snapshot.adx.di_plus.filter(|v| *v != 0.0);
                let di_minus = snapshot.adx.di_minus.filter(|v| *v != 0.0);
                if let (Some(plus), Some(minus)) = (di_plus, di_minus) {
                    if plus > minus {
                        score += 2.0;
                        reasons.push("ADX bullish (DI+ > DI-)".to_string());
                    } else {
                        score -= 2.0;
                        reasons.push("ADX bearish (DI- > DI+)".to_string());
                    }
                    weight += 2.0;
                }
            } else {
                // No numeric contribution, but the weak trend is worth a
                // rationale entry
                reasons.push(format!("ADX weak ({adx:.1})"));
            }
        }

        if let Some(current_price) = series.candles.last_close() {
            let mut ma_score = 0.0;
            let mut ma_weight = 0.0;
            let mut above = 0;
            let mut below = 0;
            for period in &config.ema_periods {
                if let Some(value) = snapshot.moving_averages.ema.get(period).copied().flatten()
                {
                    if current_price > value {
                        ma_score += 1.0;
                        above += 1;
                    } else {
                        ma_score -= 1.0;
                        below += 1;
                    }
                    ma_weight += 1.0;
                }
            }
            if ma_weight > 0.0 {
                score += ma_score;
                weight += ma_weight;
                reasons.push(format!("EMAs: {above}↑/{below}↓"));
            }
        }

        if let Some(percent) = snapshot.bollinger.percent {
            if percent > 0.8 {
                score -= 0.5; // at the top of the band, possible reversal
                reasons.push("BB upper (reversal?)".to_string());
            } else if percent < 0.2 {
                score += 0.5;
                reasons.push("BB lower (reversal?)".to_string());
            }
            weight += 0.5;
        }

        if snapshot.obv.is_some_and(|v| v != 0.0) {
            if let Some(column) = series.column("OBV") {
                let n = column.len();
                let current = column[n - 1].unwrap_or(0.0);
                let previous = if n > config.obv_lookback {
                    column[n - config.obv_lookback].unwrap_or(current)
                } else {
                    current
                };
                if current > previous * 1.02 {
                    score += 1.0;
                    reasons.push("OBV rising".to_string());
                } else if current < previous * 0.98 {
                    score -= 1.0;
                    reasons.push("OBV falling".to_string());
                }
                weight += 1.0;
            }
        }

        let final_score = if weight > 0.0 {
            ((score / weight) * 50.0).clamp(-100.0, 100.0)
        } else {
            0.0
        };
        (final_score, reasons)
    }

    /// Vote tally over the fixed indicator checklist. A checklist slot can
    /// count toward the total without casting a vote (exact-zero values
    /// abstain), so the shares are renormalized at the end.
    pub fn probabilities(
        series: &Series,
        snapshot: &IndicatorSnapshot,
        config: &AnalysisConfig,
    ) -> Probabilities {
        let mut bullish = 0usize;
        let mut bearish = 0usize;
        let mut neutral = 0usize;
        let mut total = 0usize;

        if let Some(rsi) = snapshot.rsi.filter(|r| *r != 0.0) {
            if rsi > 60.0 {
                bullish += 1;
            } else if rsi < 40.0 {
                bearish += 1;
            } else {
                neutral += 1;
            }
            total += 1;
        }

        if let Some(histogram) = snapshot.macd.histogram.filter(|h| *h != 0.0) {
            if histogram.abs() < 0.001 {
                neutral += 1;
            } else if histogram > 0.0 {
                bullish += 1;
            } else {
                bearish += 1;
            }
        }
        total += 1;

        if let Some(k) = snapshot.stochastic.k.filter(|k| *k != 0.0) {
            if k > 70.0 {
                bullish += 1;
            } else if k < 30.0 {
                bearish += 1;
            } else {
                neutral += 1;
            }
        }
        total += 1;

        // Band position votes with the move here, opposite to its
        // mean-reversion reading in the trend score
        if let Some(percent) = snapshot.bollinger.percent.filter(|p| *p != 0.0) {
            if percent > 0.8 {
                bullish += 1;
            } else if percent < 0.2 {
                bearish += 1;
            } else {
                neutral += 1;
            }
        }
        total += 1;

        if let Some(mfi) = snapshot.mfi.filter(|m| *m != 0.0) {
            if mfi > 60.0 {
                bullish += 1;
            } else if mfi < 40.0 {
                bearish += 1;
            } else {
                neutral += 1;
            }
            total += 1;
        }

        if let Some(current_price) = series.candles.last_close() {
            for period in [50usize, 200] {
                if let Some(value) = snapshot
                    .moving_averages
                    .ema
                    .get(&period)
                    .copied()
                    .flatten()
                    .filter(|v| *v != 0.0)
                {
                    let diff_percent = (current_price - value) / value * 100.0;
                    if diff_percent > 1.0 {
                        bullish += 1;
                    } else if diff_percent < -1.0 {
                        bearish += 1;
                    } else {
                        neutral += 1;
                    }
                    total += 1;
                }
            }
        }

        if let Some(column) = series.column("OBV") {
            let n = column.len();
            if n > 0 {
                let current = column[n - 1].unwrap_or(0.0);
                let window = &column[n.saturating_sub(config.obv_avg_window)..];
                let values: Vec<f64> = window.iter().flatten().copied().collect();
                let average = values.iter().sum::<f64>() / values.len() as f64;
                let diff_percent = if average != 0.0 {
                    (current - average) / average * 100.0
                } else {
                    0.0
                };
                if diff_percent > 5.0 {
                    bullish += 1;
                } else if diff_percent < -5.0 {
                    bearish += 1;
                } else {
                    neutral += 1;
                }
                total += 1;
            }
        }

        // A flat ADX marks a ranging market; its neutral vote counts twice
        if let Some(adx) = snapshot.adx.adx.filter(|a| *a != 0.0) {
            if adx < 20.0 {
                neutral += 2;
                total += 2;
            }
        }

        let (bullish_prob, bearish_prob, neutral_prob) = if total > 0 {
            let b = bullish as f64 / total as f64 * 100.0;
            let s = bearish as f64 / total as f64 * 100.0;
            let n = neutral as f64 / total as f64 * 100.0;
            let sum = b + s + n;
            if sum > 0.0 {
                (b / sum * 100.0, s / sum * 100.0, n / sum * 100.0)
            } else {
                // every slot abstained
                (33.33, 33.33, 33.34)
            }
        } else {
            (33.33, 33.33, 33.34)
        };

        Probabilities {
            bullish: round2(bullish_prob),
            bearish: round2(bearish_prob),
            neutral: round2(neutral_prob),
            bullish_signals: bullish,
            bearish_signals: bearish,
            neutral_signals: neutral,
            total_signals: total,
        }
    }

    /// Level-derived targets: everything above the current price is a
    /// bullish target, everything below a bearish one. Bullish targets
    /// sort by distance, bearish by absolute distance, five per side.
    fn price_targets(
        fibonacci: Option<&FibonacciLevels>,
        pivots: &PivotPoints,
        sr: &SupportResistance,
        current_price: Option<f64>,
    ) -> PriceTargets {
        let Some(current) = current_price else {
            return PriceTargets::default();
        };
        if current == 0.0 {
            return PriceTargets::default();
        }

        let target = |label: String, price: f64| PriceTarget {
            label,
            price: round2(price),
            distance_percent: round2((price - current) / current * 100.0),
        };

        let mut bullish = Vec::new();
        let mut bearish = Vec::new();

        if let Some(fib) = fibonacci {
            for level in &fib.retracement {
                if level.price > current {
                    bullish.push(target(
                        format!("Fib Retracement {}", level.label),
                        level.price,
                    ));
                } else if level.price < current {
                    bearish.push(target(
                        format!("Fib Retracement {}", level.label),
                        level.price,
                    ));
                }
            }
            for level in &fib.extension {
                if level.price > current {
                    bullish.push(target(format!("Fib Extension {}", level.label), level.price));
                }
            }
        }

        for (rung, price) in [(1, pivots.r1), (2, pivots.r2), (3, pivots.r3)] {
            if price > current {
                bullish.push(target(format!("Resistance R{rung}"), price));
            }
        }
        for (rung, price) in [(1, pivots.s1), (2, pivots.s2), (3, pivots.s3)] {
            if price < current {
                bearish.push(target(format!("Support S{rung}"), price));
            }
        }

        for level in &sr.resistance {
            if level.price > current {
                bullish.push(target(level.label.clone(), level.price));
            }
        }
        for level in &sr.support {
            if level.price < current {
                bearish.push(target(level.label.clone(), level.price));
            }
        }

        bullish.sort_by(|a, b| a.distance_percent.total_cmp(&b.distance_percent));
        bearish.sort_by(|a, b| {
            a.distance_percent
                .abs()
                .total_cmp(&b.distance_percent.abs())
        });
        bullish.truncate(5);
        bearish.truncate(5);

        PriceTargets { bullish, bearish }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
