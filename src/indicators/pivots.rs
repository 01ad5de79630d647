//! Classic floor-trader pivot points from the latest bar.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PivotPoints {
    pub pivot: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

/// pivot = (H+L+C)/3 with the three resistance/support rungs derived from
/// fixed linear combinations of the latest high/low/close.
pub fn pivot_points(high: f64, low: f64, close: f64) -> PivotPoints {
    let pivot = (high + low + close) / 3.0;
    PivotPoints {
        pivot,
        r1: 2.0 * pivot - low,
        r2: pivot + (high - low),
        r3: high + 2.0 * (pivot - low),
        s1: 2.0 * pivot - high,
        s2: pivot - (high - low),
        s3: low - 2.0 * (high - pivot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivot_ordering_on_a_normal_bar() {
        let p = pivot_points(110.0, 90.0, 100.0);
        assert_eq!(p.pivot, 100.0);
        assert!(p.s3 < p.s2 && p.s2 < p.s1);
        assert!(p.s1 < p.pivot && p.pivot < p.r1);
        assert!(p.r1 < p.r2 && p.r2 < p.r3);
    }

    #[test]
    fn degenerate_bar_collapses_to_price() {
        let p = pivot_points(100.0, 100.0, 100.0);
        assert_eq!(p.pivot, 100.0);
        assert_eq!(p.r3, 100.0);
        assert_eq!(p.s3, 100.0);
    }
}
