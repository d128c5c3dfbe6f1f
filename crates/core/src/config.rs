//! Configuration structures for the omniscience system.
//!
//! A `Config` is an immutable value handed to each component at
//! construction. Every field has a default, so a JSON document only needs
//! to name the values it overrides.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the analytics session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed parsing configuration.
    pub parser: ParserConfig,
    /// Rolling series configuration.
    pub series: SeriesConfig,
    /// Indicator window configuration.
    pub indicators: IndicatorConfig,
    /// Recommendation thresholds.
    pub recommendation: RecommendationConfig,
    /// Forecast configuration.
    pub forecast: ForecastConfig,
}

impl Config {
    /// Parse a (possibly partial) JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file in JSON format.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values that would make a component meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.series.default_history_len == 0 {
            return Err(Error::config("series.default_history_len must be > 0"));
        }

        let ind = &self.indicators;
        let periods = [
            ("rsi_period", ind.rsi_period),
            ("zscore_lookback", ind.zscore_lookback),
            ("bollinger_lookback", ind.bollinger_lookback),
            ("atr_lookback", ind.atr_lookback),
            ("momentum_period", ind.momentum_period),
            ("ma_period", ind.ma_period),
            ("adaptive_base_period", ind.adaptive_base_period),
            ("fibonacci_lookback", ind.fibonacci_lookback),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(Error::config(format!("indicators.{name} must be > 0")));
            }
        }
        if !ind.adaptive_sensitivity.is_finite() || ind.adaptive_sensitivity < 0.0 {
            return Err(Error::config(format!(
                "indicators.adaptive_sensitivity must be finite and >= 0, got {}",
                ind.adaptive_sensitivity
            )));
        }
        if ind.adaptive_max_period < ind.adaptive_base_period {
            return Err(Error::config(
                "indicators.adaptive_max_period must be >= adaptive_base_period",
            ));
        }

        let rec = &self.recommendation;
        for (name, value) in [
            ("strong_confidence_threshold", rec.strong_confidence_threshold),
            ("min_confidence_for_action", rec.min_confidence_for_action),
            ("kelly_fraction_cap", rec.kelly_fraction_cap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!(
                    "recommendation.{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.forecast.lmf_horizons.is_empty() {
            return Err(Error::config("forecast.lmf_horizons must not be empty"));
        }
        if self.forecast.min_samples < 2 {
            return Err(Error::config("forecast.min_samples must be >= 2"));
        }

        Ok(())
    }
}

/// Feed parsing toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Drop the first non-empty line of a feed.
    pub ignore_header_rows: bool,
    /// Accept 5-line (spread/total/moneyline) blocks.
    pub parse_5_line_blocks: bool,
    /// Accept 4-line (moneyline/total/runline) blocks.
    pub parse_4_line_blocks: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            ignore_header_rows: true,
            parse_5_line_blocks: true,
            parse_4_line_blocks: true,
        }
    }
}

/// Rolling series configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Maximum observations kept per (game, market).
    pub default_history_len: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            default_history_len: 300,
        }
    }
}

/// Indicator windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub zscore_lookback: usize,
    pub bollinger_lookback: usize,
    /// Lookback over point diffs.
    pub atr_lookback: usize,
    pub momentum_period: usize,
    /// Period shared by SMA and EMA.
    pub ma_period: usize,
    pub adaptive_base_period: usize,
    pub adaptive_max_period: usize,
    pub adaptive_sensitivity: f64,
    pub fibonacci_lookback: usize,
    /// Number of raw probabilities carried in each snapshot.
    pub audit_series_len: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            zscore_lookback: 20,
            bollinger_lookback: 20,
            atr_lookback: 14,
            momentum_period: 3,
            ma_period: 10,
            adaptive_base_period: 10,
            adaptive_max_period: 30,
            adaptive_sensitivity: 2.0,
            fibonacci_lookback: 50,
            audit_series_len: 500,
        }
    }
}

/// Recommendation thresholds and stake sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Confidence at or above which the action is Back.
    pub strong_confidence_threshold: f64,
    /// Fade fires at or below this value minus 0.1.
    pub min_confidence_for_action: f64,
    /// Upper bound on the Kelly stake.
    pub kelly_fraction_cap: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            strong_confidence_threshold: 0.80,
            min_confidence_for_action: 0.55,
            kelly_fraction_cap: 0.20,
        }
    }
}

/// Point-move forecast configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Horizons (minutes) reported by the forecast ladder.
    pub lmf_horizons: Vec<u32>,
    /// Horizon fed into recommendations.
    pub primary_horizon_minutes: u32,
    /// Minimum observations carrying a point value.
    pub min_samples: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lmf_horizons: vec![30, 60, 90],
            primary_horizon_minutes: 60,
            min_samples: 5,
        }
    }
}
