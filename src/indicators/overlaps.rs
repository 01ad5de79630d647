//! Overlap studies: moving averages, Bollinger Bands, rolling VWAP.

/// Simple moving average. The first `period - 1` slots are undefined.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = Some(sum / period as f64);
    }
    out
}

/// Exponential moving average with smoothing 2/(period+1), seeded with the
/// first value. Defined from the first bar.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut current = values[0];
    out.push(current);
    for &value in &values[1..] {
        current = value * alpha + current * (1.0 - alpha);
        out.push(current);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerColumns {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub width: Vec<Option<f64>>,
    pub percent: Vec<Option<f64>>,
}

/// Bollinger Bands: SMA(period) ± k·σ (population σ), plus band width as a
/// percentage of the middle band and %B position of the close inside the
/// band. A degenerate band yields %B = 0.5 (neutral) instead of dividing
/// by zero.
pub fn bollinger(close: &[f64], period: usize, k: f64) -> BollingerColumns {
    let n = close.len();
    let mut cols = BollingerColumns {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
        width: vec![None; n],
        percent: vec![None; n],
    };
    if period == 0 || n < period {
        return cols;
    }

    for i in (period - 1)..n {
        let window = &close[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance =
            window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        let sigma = variance.sqrt();

        let upper = mean + k * sigma;
        let lower = mean - k * sigma;
        cols.middle[i] = Some(mean);
        cols.upper[i] = Some(upper);
        cols.lower[i] = Some(lower);
        cols.width[i] = (mean != 0.0).then(|| (upper - lower) / mean * 100.0);
        cols.percent[i] = Some(if upper > lower {
            (close[i] - lower) / (upper - lower)
        } else {
            0.5
        });
    }
    cols
}

/// Rolling volume-weighted average price over typical prices.
pub fn vwap(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    period: usize,
) -> Vec<Option<f64>> {
    let n = close.len();
    let mut out = vec![None; n];
    if period == 0 || n < period {
        return out;
    }
    for i in (period - 1)..n {
        let mut pv = 0.0;
        let mut v = 0.0;
        for j in i + 1 - period..=i {
            let typical = (high[j] + low[j] + close[j]) / 3.0;
            pv += typical * volume[j];
            v += volume[j];
        }
        out[i] = (v != 0.0).then(|| pv / v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_pads_warmup_with_none() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&values, 3);
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_eq!(result[2], Some(2.0));
        assert_eq!(result[4], Some(4.0));
    }

    #[test]
    fn ema_seeds_with_first_value() {
        let values = [10.0, 10.0, 10.0];
        let result = ema(&values, 9);
        assert_eq!(result, vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn bollinger_flat_series_is_neutral() {
        let close = [5.0; 25];
        let cols = bollinger(&close, 20, 2.0);
        assert_eq!(cols.middle[19], Some(5.0));
        assert_eq!(cols.upper[19], Some(5.0));
        assert_eq!(cols.percent[19], Some(0.5));
        assert_eq!(cols.width[19], Some(0.0));
    }

    #[test]
    fn bollinger_warmup_is_null() {
        let close: Vec<f64> = (1..=25).map(f64::from).collect();
        let cols = bollinger(&close, 20, 2.0);
        assert!(cols.upper[..19].iter().all(Option::is_none));
        assert!(cols.upper[19].is_some());
    }
}
