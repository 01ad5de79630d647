//! Momentum and trend oscillators: RSI, MACD, Stochastic, Williams %R,
//! CCI, ROC, ADX.

use crate::indicators::overlaps::ema;
use crate::indicators::volatility::true_range;

/// Wilder RSI. Needs `period` close-to-close changes, so the first defined
/// value is at index `period`. A window with zero average gain and loss
/// reads as 50; zero average loss alone reads as 100.
pub fn rsi(close: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = close.len();
    let mut out = vec![None; n];
    if period == 0 || n <= period {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = close[i] - close[i - 1];
        if change >= 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..n {
        let change = close[i] - close[i - 1];
        let (gain, loss) = if change >= 0.0 { (change, 0.0) } else { (0.0, -change) };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdColumns {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD: fast EMA − slow EMA, defined from index `slow − 1`; the signal
/// line is an EMA over the defined MACD values and needs `signal_period`
/// of them; histogram = macd − signal where both exist.
pub fn macd(close: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdColumns {
    let n = close.len();
    let mut cols = MacdColumns {
        macd: vec![None; n],
        signal: vec![None; n],
        histogram: vec![None; n],
    };
    if n == 0 || slow == 0 || slow < fast {
        return cols;
    }

    let fast_ema = ema(close, fast);
    let slow_ema = ema(close, slow);

    let alpha = 2.0 / (signal_period as f64 + 1.0);
    let mut signal_value = None;
    let mut macd_count = 0usize;

    for i in (slow.saturating_sub(1))..n {
        let line = fast_ema[i] - slow_ema[i];
        cols.macd[i] = Some(line);
        macd_count += 1;

        signal_value = Some(match signal_value {
            None => line,
            Some(prev) => line * alpha + prev * (1.0 - alpha),
        });
        if macd_count >= signal_period {
            cols.signal[i] = signal_value;
            cols.histogram[i] = Some(line - signal_value.expect("signal set above"));
        }
    }
    cols
}

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticColumns {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// Stochastic oscillator: %K over rolling extremes and %D as a
/// `smooth`-bar simple average of %K. A degenerate high/low range reads
/// as 50 (neutral).
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    smooth: usize,
) -> StochasticColumns {
    let n = close.len();
    let mut cols = StochasticColumns {
        k: vec![None; n],
        d: vec![None; n],
    };
    if period == 0 || n < period {
        return cols;
    }

    for i in (period - 1)..n {
        let window = i + 1 - period..=i;
        let highest = high[window.clone()].iter().copied().fold(f64::MIN, f64::max);
        let lowest = low[window].iter().copied().fold(f64::MAX, f64::min);
        cols.k[i] = Some(if highest > lowest {
            (close[i] - lowest) / (highest - lowest) * 100.0
        } else {
            50.0
        });
    }

    // %D is the smooth-bar SMA of %K, defined once enough %K values exist
    if smooth > 0 {
        let first_k = period - 1;
        for i in (first_k + smooth - 1)..n {
            let sum: f64 = cols.k[i + 1 - smooth..=i].iter().flatten().sum();
            cols.d[i] = Some(sum / smooth as f64);
        }
    }
    cols
}

/// Williams %R: −100 × (highest high − close) / (highest high − lowest
/// low), bounded [−100, 0]. Degenerate range reads as −50.
pub fn williams_r(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = close.len();
    let mut out = vec![None; n];
    if period == 0 || n < period {
        return out;
    }
    for i in (period - 1)..n {
        let window = i + 1 - period..=i;
        let highest = high[window.clone()].iter().copied().fold(f64::MIN, f64::max);
        let lowest = low[window].iter().copied().fold(f64::MAX, f64::min);
        out[i] = Some(if highest > lowest {
            (highest - close[i]) / (highest - lowest) * -100.0
        } else {
            -50.0
        });
    }
    out
}

/// Commodity Channel Index over typical price with the conventional 0.015
/// scaling constant. Zero mean deviation reads as 0.
pub fn cci(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = close.len();
    let mut out = vec![None; n];
    if period == 0 || n < period {
        return out;
    }
    let typical: Vec<f64> = (0..n).map(|i| (high[i] + low[i] + close[i]) / 3.0).collect();
    for i in (period - 1)..n {
        let window = &typical[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let mean_dev = window.iter().map(|v| (v - mean).abs()).sum::<f64>() / period as f64;
        out[i] = Some(if mean_dev == 0.0 {
            0.0
        } else {
            (typical[i] - mean) / (0.015 * mean_dev)
        });
    }
    out
}

/// Rate of change: percent change of the close against `period` bars back.
pub fn roc(close: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = close.len();
    let mut out = vec![None; n];
    if period == 0 || n <= period {
        return out;
    }
    for i in period..n {
        let base = close[i - period];
        out[i] = (base != 0.0).then(|| (close[i] - base) / base * 100.0);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdxColumns {
    pub adx: Vec<Option<f64>>,
    pub di_plus: Vec<Option<f64>>,
    pub di_minus: Vec<Option<f64>>,
}

/// ADX with +DI/−DI, all Wilder-smoothed. The DI lines are defined from
/// index `period`, the ADX itself from index `2·period − 1` (it averages
/// the first `period` DX values). Zero smoothed true range or a zero DI
/// sum read as 0.
pub fn adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> AdxColumns {
    let n = close.len();
    let mut cols = AdxColumns {
        adx: vec![None; n],
        di_plus: vec![None; n],
        di_minus: vec![None; n],
    };
    if period == 0 || n <= period {
        return cols;
    }

    let tr = true_range(high, low, close);
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    for i in 1..n {
        let up = high[i] - high[i - 1];
        let down = low[i - 1] - low[i];
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
    }

    // Wilder running sums, seeded over the first `period` bars of movement
    let mut tr_s: f64 = tr[1..=period].iter().flatten().sum();
    let mut plus_s: f64 = plus_dm[1..=period].iter().sum();
    let mut minus_s: f64 = minus_dm[1..=period].iter().sum();

    let mut dx_history: Vec<f64> = Vec::with_capacity(n);
    let mut adx_value: Option<f64> = None;

    for i in period..n {
        if i > period {
            tr_s = tr_s - tr_s / period as f64 + tr[i].expect("tr defined past first bar");
            plus_s = plus_s - plus_s / period as f64 + plus_dm[i];
            minus_s = minus_s - minus_s / period as f64 + minus_dm[i];
        }

        let (di_p, di_m) = if tr_s > 0.0 {
            (plus_s / tr_s * 100.0, minus_s / tr_s * 100.0)
        } else {
            (0.0, 0.0)
        };
        cols.di_plus[i] = Some(di_p);
        cols.di_minus[i] = Some(di_m);

        let di_sum = di_p + di_m;
        let dx = if di_sum > 0.0 {
            (di_p - di_m).abs() / di_sum * 100.0
        } else {
            0.0
        };
        dx_history.push(dx);

        if dx_history.len() == period {
            adx_value = Some(dx_history.iter().sum::<f64>() / period as f64);
        } else if dx_history.len() > period {
            let prev = adx_value.expect("seeded when history reached period");
            adx_value = Some((prev * (period as f64 - 1.0) + dx) / period as f64);
        }
        if dx_history.len() >= period {
            cols.adx[i] = adx_value;
        }
    }
    cols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_all_null_below_warmup() {
        // 13 closes with period 14 never produce a defined value
        let close: Vec<f64> = (0..13).map(|i| 100.0 + i as f64).collect();
        assert!(rsi(&close, 14).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_first_value_at_period_index() {
        let close: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&close, 14);
        assert!(result[..14].iter().all(Option::is_none));
        assert_eq!(result[14], Some(100.0));
    }

    #[test]
    fn rsi_flat_series_is_neutral() {
        let close = vec![42.0; 30];
        let result = rsi(&close, 14);
        assert_eq!(result[14], Some(50.0));
        assert_eq!(result[29], Some(50.0));
    }

    #[test]
    fn macd_warmup_structure() {
        let close: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64).sin()).collect();
        let cols = macd(&close, 12, 26, 9);
        assert!(cols.macd[..25].iter().all(Option::is_none));
        assert!(cols.macd[25].is_some());
        assert!(cols.signal[..33].iter().all(Option::is_none));
        assert!(cols.signal[33].is_some());
        assert!(cols.histogram[33].is_some());
    }

    #[test]
    fn stochastic_flat_range_is_neutral() {
        let flat = vec![7.0; 20];
        let cols = stochastic(&flat, &flat, &flat, 14, 3);
        assert_eq!(cols.k[13], Some(50.0));
        assert_eq!(cols.d[15], Some(50.0));
    }

    #[test]
    fn stochastic_extremes_are_bounded() {
        let n = 20;
        let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let high: Vec<f64> = close.clone();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        let cols = stochastic(&high, &low, &close, 14, 3);
        let k = cols.k[n - 1].unwrap();
        assert!((0.0..=100.0).contains(&k));
        assert_eq!(k, 100.0);
    }

    #[test]
    fn williams_r_mirrors_stochastic() {
        let n = 20;
        let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let result = williams_r(&close, &close, &close, 14);
        // Close pinned at the highest high of the window
        assert_eq!(result[n - 1], Some(0.0));
    }

    #[test]
    fn cci_zero_deviation_guard() {
        let flat = vec![3.0; 25];
        let result = cci(&flat, &flat, &flat, 20);
        assert_eq!(result[19], Some(0.0));
    }

    #[test]
    fn roc_against_n_bars_back() {
        let close: Vec<f64> = (1..=20).map(f64::from).collect();
        let result = roc(&close, 12);
        assert!(result[..12].iter().all(Option::is_none));
        // close[12] = 13 vs close[0] = 1
        assert_eq!(result[12], Some(1200.0));
    }

    #[test]
    fn adx_warmup_structure() {
        let n = 40;
        let high: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * 1.5).collect();
        let low: Vec<f64> = high.iter().map(|h| h - 2.0).collect();
        let close: Vec<f64> = high.iter().map(|h| h - 0.5).collect();
        let cols = adx(&high, &low, &close, 14);
        assert!(cols.di_plus[..14].iter().all(Option::is_none));
        assert!(cols.di_plus[14].is_some());
        assert!(cols.adx[..27].iter().all(Option::is_none));
        assert!(cols.adx[27].is_some());
        // Steady uptrend: +DI dominates
        assert!(cols.di_plus[n - 1].unwrap() > cols.di_minus[n - 1].unwrap());
    }

    #[test]
    fn adx_flat_series_does_not_panic() {
        let flat = vec![10.0; 40];
        let cols = adx(&flat, &flat, &flat, 14);
        assert_eq!(cols.adx[39], Some(0.0));
        assert_eq!(cols.di_plus[39], Some(0.0));
    }
}
