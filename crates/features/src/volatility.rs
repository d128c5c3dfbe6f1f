//! Volatility measures.
//!
//! Bollinger width and implied volatility run on probabilities; ATR runs on
//! point values (spread / total lines).

use omni_core::IndicatorValue;

use crate::stats::{diffs, mean, population_std, tail};

/// Width of the +/-2 sigma Bollinger band over the last `lookback` values.
pub fn bollinger_width(values: &[f64], lookback: usize) -> IndicatorValue {
    if values.len() < lookback {
        return IndicatorValue::insufficient(values.len(), lookback);
    }
    let sd = population_std(tail(values, lookback));
    IndicatorValue::Available(4.0 * sd)
}

/// Average true range of point values.
///
/// Mean absolute step over the last `lookback` steps, or over every step
/// when fewer are available.
pub fn atr(points: &[f64], lookback: usize) -> IndicatorValue {
    if points.len() < 2 {
        return IndicatorValue::insufficient(points.len(), 2);
    }
    let ranges: Vec<f64> = diffs(points).into_iter().map(f64::abs).collect();
    IndicatorValue::Available(mean(tail(&ranges, lookback)))
}

/// Standard deviation of successive probability changes.
pub fn implied_volatility(values: &[f64]) -> IndicatorValue {
    if values.len() < 2 {
        return IndicatorValue::insufficient(values.len(), 2);
    }
    IndicatorValue::Available(population_std(&diffs(values)))
}
