//! Sensitivities of implied probability to line movement.

use omni_core::IndicatorValue;
use serde::{Deserialize, Serialize};

use crate::stats::{diffs, median, population_std};

/// Samples needed in both the probability and point series.
pub const GREEKS_MIN_SAMPLES: usize = 3;

/// Point steps smaller than this are treated as no line move.
const MIN_POINT_STEP: f64 = 1e-8;

/// Option-style sensitivities of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Median probability change per point of line move.
    pub delta: IndicatorValue,
    /// Median change of delta between successive line moves.
    pub gamma: IndicatorValue,
    /// Dispersion of probability changes.
    pub vega: IndicatorValue,
}

/// Estimate greeks from a probability series and its point values.
///
/// Steps are paired by position. Steps where the line did not move are
/// skipped, so delta and vega stay unavailable until the line has moved at
/// least once and gamma until it has moved twice.
pub fn estimate_greeks(probabilities: &[f64], points: &[f64]) -> IndicatorValue<Greeks> {
    let have = probabilities.len().min(points.len());
    if have < GREEKS_MIN_SAMPLES {
        return IndicatorValue::insufficient(have, GREEKS_MIN_SAMPLES);
    }

    let d_ip = diffs(probabilities);
    let d_pts = diffs(points);
    let ratios: Vec<f64> = d_ip
        .iter()
        .zip(&d_pts)
        .filter(|(_, dp)| dp.abs() >= MIN_POINT_STEP)
        .map(|(di, dp)| di / dp)
        .collect();

    let (delta, vega) = match median(&ratios) {
        Some(delta) => (
            IndicatorValue::Available(delta),
            IndicatorValue::Available(population_std(&d_ip)),
        ),
        None => (
            IndicatorValue::insufficient(0, 1),
            IndicatorValue::insufficient(0, 1),
        ),
    };

    let gamma = if ratios.len() >= 2 {
        median(&diffs(&ratios))
            .map(IndicatorValue::Available)
            .unwrap_or_else(|| IndicatorValue::insufficient(ratios.len(), 2))
    } else {
        IndicatorValue::insufficient(ratios.len(), 2)
    };

    IndicatorValue::Available(Greeks { delta, gamma, vega })
}
