//! Volatility measures: true range and Wilder-smoothed ATR.

/// True range per bar: max(high−low, |high−prev close|, |low−prev close|).
/// Undefined at the first bar, where no previous close exists.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
    let n = close.len();
    let mut out = vec![None; n];
    for i in 1..n {
        let prev_close = close[i - 1];
        let tr = (high[i] - low[i])
            .max((high[i] - prev_close).abs())
            .max((low[i] - prev_close).abs());
        out[i] = Some(tr);
    }
    out
}

/// Average true range with Wilder smoothing: seeded with the simple average
/// of the first `period` true ranges, then
/// ATR = (prev·(period−1) + TR) / period. First defined at index `period`.
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = close.len();
    let mut out = vec![None; n];
    if period == 0 || n <= period {
        return out;
    }

    let tr = true_range(high, low, close);
    let seed: f64 = tr[1..=period].iter().flatten().sum::<f64>() / period as f64;
    let mut current = seed;
    out[period] = Some(current);
    for i in (period + 1)..n {
        let value = tr[i].expect("true range defined past the first bar");
        current = (current * (period as f64 - 1.0) + value) / period as f64;
        out[i] = Some(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_range_uses_previous_close_gaps() {
        let high = [10.0, 12.0];
        let low = [9.0, 11.0];
        let close = [9.5, 11.5];
        let tr = true_range(&high, &low, &close);
        assert_eq!(tr[0], None);
        // max(12-11, |12-9.5|, |11-9.5|) = 2.5
        assert_eq!(tr[1], Some(2.5));
    }

    #[test]
    fn atr_is_zero_on_flat_series() {
        let n = 30;
        let flat = vec![5.0; n];
        let result = atr(&flat, &flat, &flat, 14);
        assert!(result[..14].iter().all(Option::is_none));
        assert_eq!(result[14], Some(0.0));
        assert_eq!(result[n - 1], Some(0.0));
    }

    #[test]
    fn atr_warmup_matches_period() {
        let high: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
        let low: Vec<f64> = high.iter().map(|h| h - 1.0).collect();
        let close: Vec<f64> = high.iter().map(|h| h - 0.5).collect();
        let result = atr(&high, &low, &close, 14);
        assert!(result[..14].iter().all(Option::is_none));
        assert!(result[14].is_some());
    }
}
