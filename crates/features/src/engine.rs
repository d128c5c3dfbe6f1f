//! Indicator aggregation engine.
//!
//! Combines all indicator components into one snapshot per series.

use omni_core::config::IndicatorConfig;
use omni_core::{IndicatorValue, SeriesPoint, SplitsRecord};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    fibonacci::{fibonacci_levels, FibonacciLevels},
    greeks::{estimate_greeks, Greeks},
    momentum::{momentum, Momentum},
    moving_average::{adaptive_ma, ema, sma, AdaptiveParams},
    oscillators::{rsi, z_score},
    stats::tail,
    steam::{detect_steam, SteamParams, SteamSignal},
    volatility::{atr, bollinger_width, implied_volatility},
};

/// Every indicator for one series at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Latest implied probability.
    pub current_value: f64,
    pub sample_count: usize,
    pub momentum: Momentum,
    pub rsi: IndicatorValue,
    pub z_score: IndicatorValue,
    pub sma: IndicatorValue,
    pub ema: IndicatorValue,
    pub adaptive_ma: IndicatorValue,
    pub bollinger_width: IndicatorValue,
    /// ATR of point values.
    pub atr: IndicatorValue,
    /// Fibonacci levels of point values.
    pub fibonacci: IndicatorValue<FibonacciLevels>,
    pub steam: IndicatorValue<SteamSignal>,
    pub greeks: IndicatorValue<Greeks>,
    pub implied_volatility: IndicatorValue,
    /// Tail of the raw probabilities, for auditing.
    pub series: Vec<f64>,
}

impl IndicatorSet {
    /// Momentum velocity, if available.
    pub fn mom_v(&self) -> Option<f64> {
        self.momentum.velocity.get()
    }

    /// Steam confidence when steam was flagged.
    pub fn steam_confidence(&self) -> Option<f64> {
        self.steam
            .as_ref()
            .filter(|s| s.steam)
            .map(|s| s.confidence)
    }
}

/// Computes indicator snapshots with a fixed set of windows.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Aggregate a series into a snapshot.
    ///
    /// Returns `None` for an empty series. Splits feed the steam detector.
    pub fn aggregate(
        &self,
        series: &[SeriesPoint],
        splits: Option<&SplitsRecord>,
    ) -> Option<IndicatorSet> {
        let values: Vec<f64> = series.iter().map(|p| p.implied_probability).collect();
        let points: Vec<f64> = series.iter().filter_map(|p| p.point).collect();
        self.aggregate_values(&values, &points, splits)
    }

    /// Aggregate raw probabilities and the present point values.
    pub fn aggregate_values(
        &self,
        values: &[f64],
        points: &[f64],
        splits: Option<&SplitsRecord>,
    ) -> Option<IndicatorSet> {
        let &current_value = values.last()?;
        let cfg = &self.config;

        trace!(samples = values.len(), points = points.len(), "aggregating indicators");

        Some(IndicatorSet {
            current_value,
            sample_count: values.len(),
            momentum: momentum(values, cfg.momentum_period),
            rsi: rsi(values, cfg.rsi_period),
            z_score: z_score(values, cfg.zscore_lookback),
            sma: sma(values, cfg.ma_period),
            ema: ema(values, cfg.ma_period),
            adaptive_ma: adaptive_ma(values, self.adaptive_params()),
            bollinger_width: bollinger_width(values, cfg.bollinger_lookback),
            atr: atr(points, cfg.atr_lookback),
            fibonacci: fibonacci_levels(points, cfg.fibonacci_lookback),
            steam: detect_steam(values, splits, self.steam_params()),
            greeks: estimate_greeks(values, points),
            implied_volatility: implied_volatility(values),
            series: tail(values, cfg.audit_series_len).to_vec(),
        })
    }

    fn adaptive_params(&self) -> AdaptiveParams {
        AdaptiveParams {
            base_period: self.config.adaptive_base_period,
            max_period: self.config.adaptive_max_period,
            sensitivity: self.config.adaptive_sensitivity,
        }
    }

    fn steam_params(&self) -> SteamParams {
        SteamParams {
            zscore_lookback: self.config.zscore_lookback,
            momentum_period: self.config.momentum_period,
        }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(IndicatorConfig::default())
    }
}
