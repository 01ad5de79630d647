//! Volume-flow indicators: OBV, Money Flow Index, Chaikin Money Flow.

/// On-balance volume: signed cumulative volume, starting at 0. Volume is
/// added when the close rises, subtracted when it falls, unchanged on a
/// flat close.
pub fn obv(close: &[f64], volume: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(close.len());
    let mut total = 0.0;
    for i in 0..close.len() {
        if i > 0 {
            if close[i] > close[i - 1] {
                total += volume[i];
            } else if close[i] < close[i - 1] {
                total -= volume[i];
            }
        }
        out.push(total);
    }
    out
}

/// Money Flow Index over typical-price money flow. Needs `period` typical
/// price changes, so the first defined value sits at index `period`.
/// A window with zero flow in both directions reads as 50 (neutral).
pub fn mfi(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    period: usize,
) -> Vec<Option<f64>> {
    let n = close.len();
    let mut out = vec![None; n];
    if period == 0 || n <= period {
        return out;
    }

    let typical: Vec<f64> = (0..n).map(|i| (high[i] + low[i] + close[i]) / 3.0).collect();

    // Signed money flow per bar, defined from index 1
    let mut positive = vec![0.0; n];
    let mut negative = vec![0.0; n];
    for i in 1..n {
        let flow = typical[i] * volume[i];
        if typical[i] > typical[i - 1] {
            positive[i] = flow;
        } else if typical[i] < typical[i - 1] {
            negative[i] = flow;
        }
    }

    for i in period..n {
        let pos: f64 = positive[i + 1 - period..=i].iter().sum();
        let neg: f64 = negative[i + 1 - period..=i].iter().sum();
        out[i] = Some(if pos + neg == 0.0 {
            50.0
        } else if neg == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + pos / neg)
        });
    }
    out
}

/// Chaikin Money Flow: windowed sum of money-flow volume over windowed sum
/// of volume. A zero-range bar contributes a multiplier of 0.
pub fn cmf(
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

    let mfv: Vec<f64> = (0..n)
        .map(|i| {
            let range = high[i] - low[i];
            if range > 0.0 {
                ((close[i] - low[i]) - (high[i] - close[i])) / range * volume[i]
            } else {
                0.0
            }
        })
        .collect();

    for i in (period - 1)..n {
        let flow: f64 = mfv[i + 1 - period..=i].iter().sum();
        let vol: f64 = volume[i + 1 - period..=i].iter().sum();
        out[i] = (vol != 0.0).then(|| flow / vol);
    }
    out
}
