//! Price/RSI divergence detection over distance-gated local extrema.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DivergenceKind {
    BearishRsi,
    BullishRsi,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divergence {
    pub kind: DivergenceKind,
    pub index: usize,
    pub price: f64,
    pub rsi: f64,
    /// An RSI gap above 10 points between the compared extrema.
    pub strong: bool,
}

const PEAK_DISTANCE: usize = 10;
const STRONG_GAP: f64 = 10.0;

/// Bearish divergence: a higher price peak paired with a lower RSI peak.
/// Bullish divergence: a lower price trough with a higher RSI trough.
/// Extrema closer than ten bars to a larger one are discarded first.
pub fn rsi_divergences(close: &[f64], rsi: &[Option<f64>]) -> Vec<Divergence> {
    let mut found = Vec::new();

    let peaks = local_extrema(close, false);
    for pair in peaks.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let (Some(rsi_prev), Some(rsi_curr)) = (rsi[prev], rsi[curr]) else {
            continue;
        };
        if close[curr] > close[prev] && rsi_curr < rsi_prev {
            found.push(Divergence {
                kind: DivergenceKind::BearishRsi,
                index: curr,
                price: close[curr],
                rsi: rsi_curr,
                strong: (rsi_curr - rsi_prev).abs() > STRONG_GAP,
            });
        }
    }

    let troughs = local_extrema(close, true);
    for pair in troughs.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let (Some(rsi_prev), Some(rsi_curr)) = (rsi[prev], rsi[curr]) else {
            continue;
        };
        if close[curr] < close[prev] && rsi_curr > rsi_prev {
            found.push(Divergence {
                kind: DivergenceKind::BullishRsi,
                index: curr,
                price: close[curr],
                rsi: rsi_curr,
                strong: (rsi_curr - rsi_prev).abs() > STRONG_GAP,
            });
        }
    }

    found
}

/// Strict local extrema, then a greedy distance filter: larger extrema
/// suppress smaller ones within `PEAK_DISTANCE` bars. Returned in index
/// order.
fn local_extrema(values: &[f64], invert: bool) -> Vec<usize> {
    let sign = if invert { -1.0 } else { 1.0 };
    let mut candidates: Vec<usize> = (1..values.len().saturating_sub(1))
        .filter(|&i| {
            let v = sign * values[i];
            v > sign * values[i - 1] && v > sign * values[i + 1]
        })
        .collect();

    candidates.sort_by(|&a, &b| (sign * values[b]).total_cmp(&(sign * values[a])));
    let mut kept: Vec<usize> = Vec::new();
    for idx in candidates {
        if kept.iter().all(|&k| k.abs_diff(idx) >= PEAK_DISTANCE) {
            kept.push(idx);
        }
    }
    kept.sort_unstable();
    kept
}
