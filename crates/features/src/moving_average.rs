//! Simple, exponential and adaptive moving averages.

use omni_core::IndicatorValue;

use crate::stats::{mean, population_std, tail};

/// Parameters of the adaptive moving average.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveParams {
    pub base_period: usize,
    pub max_period: usize,
    pub sensitivity: f64,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self {
            base_period: 10,
            max_period: 30,
            sensitivity: 2.0,
        }
    }
}

/// Mean of the last `period` values (all of them if fewer).
pub fn sma(values: &[f64], period: usize) -> IndicatorValue {
    if values.is_empty() {
        return IndicatorValue::insufficient(0, 1);
    }
    IndicatorValue::Available(mean(tail(values, period)))
}

/// Exponential moving average seeded at the first value and run over the
/// whole series.
pub fn ema(values: &[f64], period: usize) -> IndicatorValue {
    let Some((&first, rest)) = values.split_first() else {
        return IndicatorValue::insufficient(0, 1);
    };

    let alpha = 2.0 / (period as f64 + 1.0);
    let value = rest
        .iter()
        .fold(first, |acc, &v| alpha * v + (1.0 - alpha) * acc);
    IndicatorValue::Available(value)
}

/// Moving average whose window stretches with directional efficiency.
///
/// Efficiency is the net move across the base window divided by its
/// standard deviation scaled by `sqrt(base)`. The window grows from
/// `base_period` towards `max_period` as efficiency rises.
pub fn adaptive_ma(values: &[f64], params: AdaptiveParams) -> IndicatorValue {
    let base = params.base_period.max(1);
    let n = values.len();
    if n < base {
        return IndicatorValue::insufficient(n, base);
    }

    let vol = population_std(tail(values, base));
    let efficiency = if vol == 0.0 {
        0.0
    } else {
        let direction = (values[n - 1] - values[n - base]).abs();
        direction / (vol * (base as f64).sqrt())
    };

    let stretch = (params.max_period.saturating_sub(base) as f64 * efficiency * params.sensitivity) as usize;
    let window = base.saturating_add(stretch).min(params.max_period.max(base));
    IndicatorValue::Available(mean(tail(values, window)))
}
