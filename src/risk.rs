//! Return-based risk metrics over the close series.
//!
//! All figures derive from close-to-close returns annualized over 252
//! trading days. Ratios are computed on raw fractions; the reported
//! return, volatility, drawdown and VaR fields are percentages.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub annual_return: f64,
    pub annual_volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub max_drawdown: f64,
    pub var_95: f64,
    pub cvar_95: f64,
    pub risk_level: RiskLevel,
}

const TRADING_DAYS: f64 = 252.0;

/// Compute the risk profile of a close series. Returns `None` when fewer
/// than three closes exist (sample deviation needs at least two returns).
pub fn risk_metrics(close: &[f64], risk_free_rate: f64) -> Option<RiskMetrics> {
    let returns = pct_changes(close);
    if returns.len() < 2 {
        return None;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let annual_return = mean * TRADING_DAYS;
    let annual_volatility = sample_std(&returns, mean) * TRADING_DAYS.sqrt();

    let sharpe_ratio = if annual_volatility != 0.0 {
        (annual_return - risk_free_rate) / annual_volatility
    } else {
        0.0
    };

    let max_drawdown = {
        let mut cumulative = 1.0f64;
        let mut running_max = 1.0f64;
        let mut worst = 0.0f64;
        for r in &returns {
            cumulative *= 1.0 + r;
            running_max = running_max.max(cumulative);
            worst = worst.min((cumulative - running_max) / running_max);
        }
        worst
    };

    let var_95 = quantile(&returns, 0.05);
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var_95).collect();
    let cvar_95 = if tail.is_empty() {
        var_95
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    };

    let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let sortino_ratio = if negative.len() >= 2 {
        let neg_mean = negative.iter().sum::<f64>() / negative.len() as f64;
        let downside = sample_std(&negative, neg_mean) * TRADING_DAYS.sqrt();
        if downside != 0.0 {
            (annual_return - risk_free_rate) / downside
        } else {
            0.0
        }
    } else {
        0.0
    };

    let calmar_ratio = if max_drawdown != 0.0 {
        annual_return / max_drawdown.abs()
    } else {
        0.0
    };

    let risk_level = if annual_volatility < 0.15 {
        RiskLevel::Low
    } else if annual_volatility < 0.25 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    Some(RiskMetrics {
        annual_return: annual_return * 100.0,
        annual_volatility: annual_volatility * 100.0,
        sharpe_ratio,
        sortino_ratio,
        calmar_ratio,
        max_drawdown: max_drawdown * 100.0,
        var_95: var_95 * 100.0,
        cvar_95: cvar_95 * 100.0,
        risk_level,
    })
}

fn pct_changes(close: &[f64]) -> Vec<f64> {
    close
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() as f64 - 1.0);
    variance.sqrt()
}

/// Linear-interpolation quantile of an unsorted sample.
fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let position = q * (sorted.len() as f64 - 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = position - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_series_yields_none() {
        assert!(risk_metrics(&[100.0, 101.0], 0.02).is_none());
    }

    #[test]
    fn flat_series_has_zero_risk() {
        let close = vec![100.0; 50];
        let metrics = risk_metrics(&close, 0.02).unwrap();
        assert_eq!(metrics.annual_return, 0.0);
        assert_eq!(metrics.annual_volatility, 0.0);
        assert_eq!(metrics.max_drawdown, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_eq!(metrics.risk_level, RiskLevel::Low);
    }

    #[test]
    fn drawdown_captures_the_worst_slide() {
        // 100 -> 120 -> 90: the slide from 120 to 90 is -25%
        let close = [100.0, 120.0, 90.0];
        let metrics = risk_metrics(&close, 0.0).unwrap();
        assert!((metrics.max_drawdown - (-25.0)).abs() < 1e-9);
        assert!(metrics.calmar_ratio != 0.0);
    }

    #[test]
    fn quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&values, 0.05) - 1.15).abs() < 1e-12);
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 1.0), 4.0);
    }

    #[test]
    fn volatile_series_is_flagged() {
        let close: Vec<f64> = (0..100)
            .map(|i| 100.0 * (1.0 + 0.05 * if i % 2 == 0 { 1.0 } else { -1.0 }))
            .collect();
        let metrics = risk_metrics(&close, 0.02).unwrap();
        assert_eq!(metrics.risk_level, RiskLevel::High);
    }
}
