//! Composition of the indicator pipeline.
//!
//! Every indicator is a pure function over the candle columns; the engine
//! calls them in explicit dependency order, attaches the aligned output
//! columns to the [`Series`], and extracts the "current" snapshot from the
//! final bar.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::data::models::{CandleData, Series};
use crate::error::AnalysisError;
use crate::indicators::oscillators::{adx, cci, macd, roc, rsi, stochastic, williams_r};
use crate::indicators::overlaps::{bollinger, ema, sma, vwap};
use crate::indicators::pivots::{pivot_points, PivotPoints};
use crate::indicators::volatility::atr;
use crate::indicators::volume::{cmf, mfi, obv};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSnapshot {
    pub sma: BTreeMap<usize, Option<f64>>,
    pub ema: BTreeMap<usize, Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdSnapshot {
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerSnapshot {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
    pub width: Option<f64>,
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StochasticSnapshot {
    pub k: Option<f64>,
    pub d: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdxSnapshot {
    pub adx: Option<f64>,
    pub di_plus: Option<f64>,
    pub di_minus: Option<f64>,
}

/// Most recent value of every configured indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub moving_averages: MovingAverageSnapshot,
    pub rsi: Option<f64>,
    pub macd: MacdSnapshot,
    pub bollinger: BollingerSnapshot,
    pub stochastic: StochasticSnapshot,
    pub adx: AdxSnapshot,
    pub atr: Option<f64>,
    pub cci: Option<f64>,
    pub obv: Option<f64>,
    pub williams_r: Option<f64>,
    pub mfi: Option<f64>,
    pub cmf: Option<f64>,
    pub roc: Option<f64>,
    pub vwap: Option<f64>,
    pub pivots: PivotPoints,
}

pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Compute all configured indicators and the current snapshot.
    ///
    /// An empty series is the one condition reported as an error; a short
    /// series simply leaves the affected columns null-padded.
    pub fn compute(
        data: &CandleData,
        config: &AnalysisConfig,
    ) -> Result<(Series, IndicatorSnapshot), AnalysisError> {
        if data.is_empty() {
            return Err(AnalysisError::NoData);
        }

        let mut series = Series::new(data.clone());
        let close = &data.close;
        let high = &data.high;
        let low = &data.low;
        let volume = &data.volume;

        let mut sma_current = BTreeMap::new();
        for &period in &config.sma_periods {
            let column = sma(close, period);
            sma_current.insert(period, column.last().copied().flatten());
            series.insert_column(format!("SMA_{period}"), column);
        }

        let mut ema_current = BTreeMap::new();
        for &period in &config.ema_periods {
            let column: Vec<Option<f64>> = ema(close, period).into_iter().map(Some).collect();
            ema_current.insert(period, column.last().copied().flatten());
            series.insert_column(format!("EMA_{period}"), column);
        }

        let rsi_column = rsi(close, config.rsi_period);
        let rsi_current = rsi_column.last().copied().flatten();
        series.insert_column("RSI", rsi_column);

        let macd_cols = macd(close, config.macd_fast, config.macd_slow, config.macd_signal);
        let macd_current = MacdSnapshot {
            macd: macd_cols.macd.last().copied().flatten(),
            signal: macd_cols.signal.last().copied().flatten(),
            histogram: macd_cols.histogram.last().copied().flatten(),
        };
        series.insert_column("MACD", macd_cols.macd);
        series.insert_column("MACD_signal", macd_cols.signal);
        series.insert_column("MACD_diff", macd_cols.histogram);

        let bb = bollinger(close, config.bb_period, config.bb_std);
        let bollinger_current = BollingerSnapshot {
            upper: bb.upper.last().copied().flatten(),
            middle: bb.middle.last().copied().flatten(),
            lower: bb.lower.last().copied().flatten(),
            width: bb.width.last().copied().flatten(),
            percent: bb.percent.last().copied().flatten(),
        };
        series.insert_column("BB_upper", bb.upper);
        series.insert_column("BB_middle", bb.middle);
        series.insert_column("BB_lower", bb.lower);
        series.insert_column("BB_width", bb.width);
        series.insert_column("BB_percent", bb.percent);

        let stoch = stochastic(high, low, close, config.stoch_period, config.stoch_smooth);
        let stochastic_current = StochasticSnapshot {
            k: stoch.k.last().copied().flatten(),
            d: stoch.d.last().copied().flatten(),
        };
        series.insert_column("Stoch_K", stoch.k);
        series.insert_column("Stoch_D", stoch.d);

        let adx_cols = adx(high, low, close, config.adx_period);
        let adx_current = AdxSnapshot {
            adx: adx_cols.adx.last().copied().flatten(),
            di_plus: adx_cols.di_plus.last().copied().flatten(),
            di_minus: adx_cols.di_minus.last().copied().flatten(),
        };
        series.insert_column("ADX", adx_cols.adx);
        series.insert_column("ADX_pos", adx_cols.di_plus);
        series.insert_column("ADX_neg", adx_cols.di_minus);

        let atr_column = atr(high, low, close, config.atr_period);
        let atr_current = atr_column.last().copied().flatten();
        series.insert_column("ATR", atr_column);

        let cci_column = cci(high, low, close, config.cci_period);
        let cci_current = cci_column.last().copied().flatten();
        series.insert_column("CCI", cci_column);

        let obv_column: Vec<Option<f64>> = obv(close, volume).into_iter().map(Some).collect();
        let obv_current = obv_column.last().copied().flatten();
        series.insert_column("OBV", obv_column);

        let williams_column = williams_r(high, low, close, config.williams_period);
        let williams_current = williams_column.last().copied().flatten();
        series.insert_column("Williams_R", williams_column);

        let mfi_column = mfi(high, low, close, volume, config.mfi_period);
        let mfi_current = mfi_column.last().copied().flatten();
        series.insert_column("MFI", mfi_column);

        let cmf_column = cmf(high, low, close, volume, config.cmf_period);
        let cmf_current = cmf_column.last().copied().flatten();
        series.insert_column("CMF", cmf_column);

        let roc_column = roc(close, config.roc_period);
        let roc_current = roc_column.last().copied().flatten();
        series.insert_column("ROC", roc_column);

        // VWAP is opt-in, as intraday volume profiles rarely make sense on
        // daily index data
        let vwap_current = if config.include_vwap {
            let vwap_column = vwap(high, low, close, volume, config.vwap_period);
            let current = vwap_column.last().copied().flatten();
            series.insert_column("VWAP", vwap_column);
            current
        } else {
            None
        };

        let last = data.len() - 1;
        let pivots = pivot_points(high[last], low[last], close[last]);

        let snapshot = IndicatorSnapshot {
            moving_averages: MovingAverageSnapshot {
                sma: sma_current,
                ema: ema_current,
            },
            rsi: rsi_current,
            macd: macd_current,
            bollinger: bollinger_current,
            stochastic: stochastic_current,
            adx: adx_current,
            atr: atr_current,
            cci: cci_current,
            obv: obv_current,
            williams_r: williams_current,
            mfi: mfi_current,
            cmf: cmf_current,
            roc: roc_current,
            vwap: vwap_current,
            pivots,
        };

        debug!(
            symbol = %data.symbol,
            candles = data.len(),
            columns = series.column_names().count(),
            "indicator pipeline complete"
        );
        Ok((series, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::Candle;
    use chrono::{TimeZone, Utc};

    fn series(n: usize) -> CandleData {
        let candles = (0..n).map(|i| {
            let base = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
            Candle {
                time: Utc.timestamp_opt(i as i64 * 86_400, 0).unwrap(),
                open: base,
                high: base + 2.0,
                low: base - 2.0,
                close: base + 1.0,
                volume: 1_000.0 + i as f64,
            }
        });
        CandleData::from_candles("TEST", "1d", candles)
    }

    #[test]
    fn empty_series_is_an_error() {
        let data = CandleData::new("TEST", "1d");
        assert!(matches!(
            IndicatorEngine::compute(&data, &AnalysisConfig::default()),
            Err(AnalysisError::NoData)
        ));
    }

    #[test]
    fn all_columns_are_aligned() {
        let data = series(60);
        let (series, _) = IndicatorEngine::compute(&data, &AnalysisConfig::default()).unwrap();
        for name in series.column_names() {
            assert_eq!(series.column(name).unwrap().len(), 60, "column {name}");
        }
    }

    #[test]
    fn snapshot_is_populated_on_long_series() {
        let data = series(250);
        let (_, snapshot) =
            IndicatorEngine::compute(&data, &AnalysisConfig::default()).unwrap();
        assert!(snapshot.rsi.is_some());
        assert!(snapshot.macd.histogram.is_some());
        assert!(snapshot.adx.adx.is_some());
        assert!(snapshot.mfi.is_some());
        assert_eq!(snapshot.moving_averages.ema.len(), 4);
        assert!(snapshot.vwap.is_none(), "vwap is off by default");
    }

    #[test]
    fn short_series_null_pads_instead_of_erroring() {
        let data = series(5);
        let (series, snapshot) =
            IndicatorEngine::compute(&data, &AnalysisConfig::default()).unwrap();
        assert!(snapshot.rsi.is_none());
        assert!(snapshot.adx.adx.is_none());
        assert!(series.column("RSI").unwrap().iter().all(Option::is_none));
        // EMA needs no warm-up
        assert!(snapshot.moving_averages.ema.values().all(Option::is_some));
    }
}
