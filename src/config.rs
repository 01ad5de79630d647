use serde::{Deserialize, Serialize};

/// Tunable parameters for a full analysis run.
///
/// Defaults mirror common charting-platform settings. Values can be
/// overridden from an optional `analyzer.toml` next to the binary or via
/// `ANALYZER_`-prefixed environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_std: f64,
    pub stoch_period: usize,
    pub stoch_smooth: usize,
    pub adx_period: usize,
    pub atr_period: usize,
    pub cci_period: usize,
    pub williams_period: usize,
    pub mfi_period: usize,
    pub cmf_period: usize,
    pub roc_period: usize,
    pub vwap_period: usize,
    pub include_vwap: bool,

    /// Bars to look back when comparing OBV against its earlier value.
    pub obv_lookback: usize,
    /// Window for the OBV-versus-average probability vote.
    pub obv_avg_window: usize,

    /// Fibonacci retracement ratios, measured down from the window high.
    pub retracement_ratios: Vec<f64>,
    /// Extension ratios (> 1), projected above the window high.
    pub extension_ratios: Vec<f64>,

    /// Centered window for local support/resistance extrema.
    pub sr_window: usize,
    /// Levels kept on each side of the current price.
    pub sr_max_levels: usize,

    /// Bars the pattern trend classifier looks back.
    pub trend_lookback: usize,
    /// Relative close change separating up/down from sideways.
    pub trend_threshold: f64,

    /// Annualized risk-free rate used by the risk metrics.
    pub risk_free_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sma_periods: Vec::new(),
            ema_periods: vec![9, 21, 50, 200],
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std: 2.0,
            stoch_period: 14,
            stoch_smooth: 3,
            adx_period: 14,
            atr_period: 14,
            cci_period: 20,
            williams_period: 14,
            mfi_period: 14,
            cmf_period: 20,
            roc_period: 12,
            vwap_period: 14,
            include_vwap: false,
            obv_lookback: 5,
            obv_avg_window: 20,
            retracement_ratios: vec![0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0, 1.618, 2.618],
            extension_ratios: vec![1.272, 1.414, 1.618, 2.0, 2.618],
            sr_window: 20,
            sr_max_levels: 5,
            trend_lookback: 5,
            trend_threshold: 0.02,
            risk_free_rate: 0.02,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from `analyzer.toml` (optional) and the
    /// environment, falling back to defaults for anything unset.
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("analyzer").required(false))
            .add_source(config::Environment::with_prefix("ANALYZER"))
            .build()?;
        // An entirely empty source set deserializes into the defaults
        // because every field is `serde(default)`.
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_parameters() {
        let config = AnalysisConfig::default();
        assert_eq!(config.ema_periods, vec![9, 21, 50, 200]);
        assert_eq!(config.rsi_period, 14);
        assert_eq!(config.macd_slow, 26);
        assert_eq!(config.sr_window, 20);
        assert!(config.retracement_ratios.contains(&0.618));
        assert!(!config.include_vwap);
    }
}
