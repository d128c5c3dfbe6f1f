//! Small numeric helpers shared by the indicators.

use ordered_float::OrderedFloat;
use statrs::statistics::Statistics;

/// The last `n` values (all of them if fewer).
#[inline]
pub fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// Arithmetic mean. NaN for an empty slice.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Population standard deviation (divides by n). NaN for an empty slice.
#[inline]
pub fn population_std(values: &[f64]) -> f64 {
    values.iter().population_std_dev()
}

/// Successive differences.
pub fn diffs(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Median, averaging the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1].0 + sorted[mid].0) / 2.0)
    } else {
        Some(sorted[mid].0)
    }
}

/// Sign as -1, 0 or 1.
#[inline]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tail() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(tail(&v, 2), &[3.0, 4.0]);
        assert_eq!(tail(&v, 10), &v);
        assert!(tail(&v, 0).is_empty());
    }

    #[test]
    fn test_population_std() {
        // numpy.std([2, 4, 4, 4, 5, 5, 7, 9]) == 2.0
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(population_std(&v), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mean(&v), 5.0, epsilon = 1e-12);
        assert_eq!(population_std(&[0.3; 5]), 0.0);
    }

    #[test]
    fn test_diffs() {
        assert_eq!(diffs(&[1.0, 3.0, 2.0]), vec![2.0, -1.0]);
        assert!(diffs(&[1.0]).is_empty());
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(0.2), 1.0);
        assert_eq!(sign(-0.0001), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }
}
