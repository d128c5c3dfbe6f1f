//! Line-movement forecasting.
//!
//! A [`Forecaster`] projects how far the point value of a series will move
//! over a horizon. [`DriftForecaster`] fits a least-squares line of point
//! value against elapsed minutes and extrapolates it.

use omni_core::config::ForecastConfig;
use omni_core::SeriesPoint;
use omni_features::stats::mean;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Projected point move over one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub horizon_minutes: u32,
    /// Expected change of the point value, in points.
    pub projected_point_move: f64,
    /// Fitted drift, in points per minute.
    pub slope_per_minute: f64,
    /// 0 to 1.
    pub confidence: f64,
    /// Pointed observations the fit used.
    pub samples: usize,
}

/// Pluggable point-move model.
pub trait Forecaster {
    /// Forecast the point move over `horizon_minutes`, or `None` when the
    /// series cannot support a forecast.
    fn forecast(&self, series: &[SeriesPoint], horizon_minutes: u32) -> Option<Forecast>;
}

/// Linear drift of point values over time.
#[derive(Debug, Clone)]
pub struct DriftForecaster {
    min_samples: usize,
}

impl DriftForecaster {
    pub fn new(min_samples: usize) -> Self {
        Self {
            min_samples: min_samples.max(2),
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.min_samples)
    }
}

impl Default for DriftForecaster {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl Forecaster for DriftForecaster {
    fn forecast(&self, series: &[SeriesPoint], horizon_minutes: u32) -> Option<Forecast> {
        let pointed: Vec<(&SeriesPoint, f64)> = series
            .iter()
            .filter_map(|p| p.point.map(|pt| (p, pt)))
            .collect();
        let n = pointed.len();
        if n < self.min_samples {
            debug!(samples = n, required = self.min_samples, "too few pointed observations to forecast");
            return None;
        }

        let origin = pointed[0].0.timestamp;
        let xs: Vec<f64> = pointed
            .iter()
            .map(|(p, _)| (p.timestamp - origin).num_milliseconds() as f64 / 60_000.0)
            .collect();
        let ys: Vec<f64> = pointed.iter().map(|&(_, pt)| pt).collect();

        let (mx, my) = (mean(&xs), mean(&ys));
        let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
        if sxx == 0.0 {
            debug!(samples = n, "observations share one timestamp, no drift to fit");
            return None;
        }
        let sxy: f64 = xs.iter().zip(&ys).map(|(x, y)| (x - mx) * (y - my)).sum();
        let syy: f64 = ys.iter().map(|y| (y - my).powi(2)).sum();

        let slope = sxy / sxx;
        let r_squared = if syy == 0.0 { 0.0 } else { sxy * sxy / (sxx * syy) };
        let confidence = (r_squared * (1.0 - 1.0 / n as f64)).clamp(0.0, 1.0);

        Some(Forecast {
            horizon_minutes,
            projected_point_move: slope * horizon_minutes as f64,
            slope_per_minute: slope,
            confidence,
            samples: n,
        })
    }
}

/// One forecast per horizon, skipping horizons the model declines.
pub fn forecast_ladder(
    forecaster: &dyn Forecaster,
    series: &[SeriesPoint],
    horizons: &[u32],
) -> Vec<Forecast> {
    horizons
        .iter()
        .filter_map(|&h| forecaster.forecast(series, h))
        .collect()
}
