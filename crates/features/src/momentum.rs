//! Momentum of a probability series.
//!
//! Velocity (MOM_V) is the per-step change over the last `period` steps.
//! Acceleration (MOM_A) is the per-step change of velocity against the
//! window immediately before it.

use omni_core::IndicatorValue;
use serde::{Deserialize, Serialize};

/// Momentum velocity and acceleration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Momentum {
    pub velocity: IndicatorValue,
    pub acceleration: IndicatorValue,
}

/// Compute momentum over `period` steps.
///
/// Velocity needs `period + 1` samples, acceleration `2 * period + 1`.
pub fn momentum(values: &[f64], period: usize) -> Momentum {
    let n = values.len();
    let p = period as f64;
    let velocity_needed = period + 1;
    let acceleration_needed = 2 * period + 1;

    if n < velocity_needed {
        return Momentum {
            velocity: IndicatorValue::insufficient(n, velocity_needed),
            acceleration: IndicatorValue::insufficient(n, acceleration_needed),
        };
    }

    let last = n - 1;
    let velocity = (values[last] - values[last - period]) / p;

    let acceleration = if n >= acceleration_needed {
        let previous = (values[last - period] - values[last - 2 * period]) / p;
        IndicatorValue::Available((velocity - previous) / p)
    } else {
        IndicatorValue::insufficient(n, acceleration_needed)
    };

    Momentum {
        velocity: IndicatorValue::Available(velocity),
        acceleration,
    }
}
