//! Fibonacci retracement and extension levels of point values.

use omni_core::IndicatorValue;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::stats::tail;

/// Retracement ratios measured down from the high.
const RETRACEMENTS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

/// Extension ratios and their offset above the high, as a fraction of range.
const EXTENSIONS: [(f64, f64); 5] = [
    (1.272, 0.272),
    (1.414, 0.414),
    (1.618, 0.618),
    (2.0, 1.0),
    (2.618, 1.618),
];

/// One ratio and the point value it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibLevel {
    pub ratio: f64,
    pub level: f64,
}

/// Levels derived from the high/low of the lookback window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    pub high: f64,
    pub low: f64,
    /// Ratios 0 through 1, high to low.
    pub retracements: Vec<FibLevel>,
    /// Ratios 1.272 through 2.618, above the high.
    pub extensions: Vec<FibLevel>,
}

/// Compute Fibonacci levels over the last `lookback` point values.
///
/// A flat window uses a range of 1 so the levels stay distinct.
pub fn fibonacci_levels(points: &[f64], lookback: usize) -> IndicatorValue<FibonacciLevels> {
    if points.len() < 2 {
        return IndicatorValue::insufficient(points.len(), 2);
    }

    let window = tail(points, lookback);
    let (Some(high), Some(low)) = (
        window.iter().copied().map(OrderedFloat).max(),
        window.iter().copied().map(OrderedFloat).min(),
    ) else {
        return IndicatorValue::insufficient(window.len(), 2);
    };
    let (high, low) = (high.0, low.0);
    let range = if high != low { high - low } else { 1.0 };

    let mut retracements = Vec::with_capacity(RETRACEMENTS.len() + 2);
    retracements.push(FibLevel { ratio: 0.0, level: high });
    retracements.extend(RETRACEMENTS.iter().map(|&ratio| FibLevel {
        ratio,
        level: high - ratio * range,
    }));
    retracements.push(FibLevel { ratio: 1.0, level: low });

    let extensions = EXTENSIONS
        .iter()
        .map(|&(ratio, offset)| FibLevel {
            ratio,
            level: high + offset * range,
        })
        .collect();

    IndicatorValue::Available(FibonacciLevels {
        high,
        low,
        retracements,
        extensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn level(levels: &[FibLevel], ratio: f64) -> f64 {
        levels
            .iter()
            .find(|l| l.ratio == ratio)
            .map(|l| l.level)
            .unwrap()
    }

    #[test]
    fn test_levels() {
        let points = [44.0, 46.0, 45.0, 48.0];
        let fib = fibonacci_levels(&points, 50).into_option().unwrap();

        assert_eq!(fib.high, 48.0);
        assert_eq!(fib.low, 44.0);
        assert_eq!(fib.retracements.len(), 7);
        assert_eq!(fib.extensions.len(), 5);

        assert_eq!(level(&fib.retracements, 0.0), 48.0);
        assert_abs_diff_eq!(level(&fib.retracements, 0.5), 46.0, epsilon = 1e-12);
        assert_abs_diff_eq!(level(&fib.retracements, 0.618), 48.0 - 0.618 * 4.0, epsilon = 1e-12);
        assert_eq!(level(&fib.retracements, 1.0), 44.0);

        assert_abs_diff_eq!(level(&fib.extensions, 2.0), 52.0, epsilon = 1e-12);
        assert_abs_diff_eq!(level(&fib.extensions, 1.618), 48.0 + 0.618 * 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lookback_window() {
        // The early extreme falls outside the window.
        let mut points = vec![60.0];
        points.extend([44.0, 45.0, 46.0]);
        let fib = fibonacci_levels(&points, 3).into_option().unwrap();
        assert_eq!(fib.high, 46.0);
        assert_eq!(fib.low, 44.0);
    }

    #[test]
    fn test_flat_window_uses_unit_range() {
        let fib = fibonacci_levels(&[-3.5, -3.5, -3.5], 50).into_option().unwrap();
        assert_abs_diff_eq!(level(&fib.retracements, 0.5), -4.0, epsilon = 1e-12);
        // Ratio 1 is always the low itself.
        assert_eq!(level(&fib.retracements, 1.0), -3.5);
        assert_abs_diff_eq!(level(&fib.extensions, 2.0), -2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_insufficient() {
        assert_eq!(fibonacci_levels(&[45.5], 50), IndicatorValue::insufficient(1, 2));
    }
}
