//! RSI and z-score.

use omni_core::IndicatorValue;

use crate::stats::{diffs, mean, population_std, tail};

/// Relative strength index over the last `period` deltas.
///
/// Uses simple means of gains and losses (no Wilder smoothing). Returns
/// exactly 100 when the window has no losses.
pub fn rsi(values: &[f64], period: usize) -> IndicatorValue {
    let needed = period + 1;
    if values.len() < needed {
        return IndicatorValue::insufficient(values.len(), needed);
    }

    let deltas = diffs(values);
    let window = tail(&deltas, period);
    let avg_gain = window.iter().map(|d| d.max(0.0)).sum::<f64>() / period as f64;
    let avg_loss = window.iter().map(|d| (-d).max(0.0)).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return IndicatorValue::Available(100.0);
    }

    let rs = avg_gain / avg_loss;
    IndicatorValue::Available(100.0 - 100.0 / (1.0 + rs))
}

/// Distance of the last value from the window mean, in standard deviations.
///
/// A flat window scores 0.
pub fn z_score(values: &[f64], lookback: usize) -> IndicatorValue {
    if values.len() < lookback {
        return IndicatorValue::insufficient(values.len(), lookback);
    }

    let window = tail(values, lookback);
    let sd = population_std(window);
    if sd == 0.0 {
        return IndicatorValue::Available(0.0);
    }

    let last = values[values.len() - 1];
    IndicatorValue::Available((last - mean(window)) / sd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rsi_insufficient() {
        let values = vec![0.5; 14];
        assert_eq!(rsi(&values, 14), IndicatorValue::insufficient(14, 15));
    }

    #[test]
    fn test_rsi_no_losses_is_100() {
        let values: Vec<f64> = (0..20).map(|i| 0.4 + i as f64 * 0.005).collect();
        assert_eq!(rsi(&values, 14), IndicatorValue::Available(100.0));

        // Flat windows have no losses either.
        assert_eq!(rsi(&[0.5; 15], 14), IndicatorValue::Available(100.0));
    }

    #[test]
    fn test_rsi_balanced() {
        // Alternating +0.01 / -0.01 over an even window: RS = 1 → 50.
        let values: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 0.50 } else { 0.51 }).collect();
        assert_abs_diff_eq!(rsi(&values, 14).get().unwrap(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rsi_all_losses() {
        let values: Vec<f64> = (0..15).map(|i| 0.6 - i as f64 * 0.01).collect();
        assert_abs_diff_eq!(rsi(&values, 14).get().unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_z_score() {
        let mut values = vec![0.5; 19];
        values.push(0.6);
        // mean = 0.505, population sd = sqrt(19 * 0.005^2 + 0.095^2) / sqrt(20)
        let sd = ((19.0 * 0.005_f64.powi(2) + 0.095_f64.powi(2)) / 20.0).sqrt();
        let expected = (0.6 - 0.505) / sd;
        assert_abs_diff_eq!(z_score(&values, 20).get().unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_z_score_flat_and_short() {
        assert_eq!(z_score(&[0.5; 20], 20), IndicatorValue::Available(0.0));
        assert_eq!(z_score(&[0.5; 5], 20), IndicatorValue::insufficient(5, 20));
    }
}
