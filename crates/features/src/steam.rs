//! Steam move detection.
//!
//! Scores a probability series on four conditions and flags steam when the
//! combined confidence clears 0.4:
//!
//! | Condition | Weight |
//! |---|---|
//! | \|z-score\| > 2.0 | 1.0 |
//! | \|MOM_V\| > 0.0005 | 1.0 |
//! | std of last 10 values > 0.02 | 0.5 |
//! | larger money % > 60 | 1.0 |

use omni_core::{IndicatorValue, SplitsRecord};
use serde::{Deserialize, Serialize};

use crate::momentum::momentum;
use crate::oscillators::z_score;
use crate::stats::{population_std, tail};

/// Samples needed before steam is assessed.
pub const STEAM_MIN_SAMPLES: usize = 6;

const ZSCORE_THRESHOLD: f64 = 2.0;
const MOMENTUM_THRESHOLD: f64 = 0.0005;
const VOLATILITY_THRESHOLD: f64 = 0.02;
const VOLATILITY_WINDOW: usize = 10;
const SHARP_MONEY_PCT: f64 = 60.0;
const STEAM_CONFIDENCE: f64 = 0.4;

/// Condition that contributed to a steam score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteamTrigger {
    ZScore,
    Momentum,
    Volatility,
    SharpSplits,
}

/// Steam assessment of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteamSignal {
    pub steam: bool,
    /// min(1, score / 3).
    pub confidence: f64,
    pub triggers: Vec<SteamTrigger>,
}

/// Windows used by the z-score and momentum conditions.
#[derive(Debug, Clone, Copy)]
pub struct SteamParams {
    pub zscore_lookback: usize,
    pub momentum_period: usize,
}

impl Default for SteamParams {
    fn default() -> Self {
        Self {
            zscore_lookback: 20,
            momentum_period: 3,
        }
    }
}

/// Assess a probability series for steam.
///
/// A z-score or momentum that is not yet available counts as zero.
pub fn detect_steam(
    values: &[f64],
    splits: Option<&SplitsRecord>,
    params: SteamParams,
) -> IndicatorValue<SteamSignal> {
    if values.len() < STEAM_MIN_SAMPLES {
        return IndicatorValue::insufficient(values.len(), STEAM_MIN_SAMPLES);
    }

    let z = z_score(values, params.zscore_lookback).get().unwrap_or(0.0);
    let mom_v = momentum(values, params.momentum_period)
        .velocity
        .get()
        .unwrap_or(0.0);
    let vol = population_std(tail(values, VOLATILITY_WINDOW));

    let mut score = 0.0;
    let mut triggers = Vec::new();

    if z.abs() > ZSCORE_THRESHOLD {
        score += 1.0;
        triggers.push(SteamTrigger::ZScore);
    }
    if mom_v.abs() > MOMENTUM_THRESHOLD {
        score += 1.0;
        triggers.push(SteamTrigger::Momentum);
    }
    if vol > VOLATILITY_THRESHOLD {
        score += 0.5;
        triggers.push(SteamTrigger::Volatility);
    }
    if splits.is_some_and(|s| s.max_money_pct() > SHARP_MONEY_PCT) {
        score += 1.0;
        triggers.push(SteamTrigger::SharpSplits);
    }

    let confidence = (score / 3.0_f64).min(1.0);
    IndicatorValue::Available(SteamSignal {
        steam: confidence > STEAM_CONFIDENCE,
        confidence,
        triggers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Utc;

    fn splits(away_money: f64, home_money: f64) -> SplitsRecord {
        SplitsRecord {
            away_bet_pct: Some(50.0),
            home_bet_pct: Some(50.0),
            away_money_pct: Some(away_money),
            home_money_pct: Some(home_money),
            parsed_at: Utc::now(),
        }
    }

    #[test]
    fn test_insufficient() {
        let result = detect_steam(&[0.5; 5], None, SteamParams::default());
        assert_eq!(result, IndicatorValue::insufficient(5, 6));
    }

    #[test]
    fn test_quiet_series() {
        let signal = detect_steam(&[0.5; 12], None, SteamParams::default())
            .into_option()
            .unwrap();
        assert!(!signal.steam);
        assert_eq!(signal.confidence, 0.0);
        assert!(signal.triggers.is_empty());
    }

    #[test]
    fn test_momentum_alone_is_not_steam() {
        let values = [0.50, 0.50, 0.50, 0.501, 0.502, 0.503];
        let signal = detect_steam(&values, None, SteamParams::default())
            .into_option()
            .unwrap();
        assert_eq!(signal.triggers, vec![SteamTrigger::Momentum]);
        assert_abs_diff_eq!(signal.confidence, 1.0 / 3.0, epsilon = 1e-12);
        assert!(!signal.steam);
    }

    #[test]
    fn test_momentum_with_sharp_money_is_steam() {
        let values = [0.50, 0.50, 0.50, 0.501, 0.502, 0.503];
        let sharp = splits(72.0, 28.0);
        let signal = detect_steam(&values, Some(&sharp), SteamParams::default())
            .into_option()
            .unwrap();
        assert_eq!(
            signal.triggers,
            vec![SteamTrigger::Momentum, SteamTrigger::SharpSplits]
        );
        assert!(signal.steam);
        assert_abs_diff_eq!(signal.confidence, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_balanced_money_does_not_trigger() {
        let even = splits(55.0, 45.0);
        let signal = detect_steam(&[0.5; 8], Some(&even), SteamParams::default())
            .into_option()
            .unwrap();
        assert!(signal.triggers.is_empty());
    }

    #[test]
    fn test_sharp_jump_saturates() {
        let mut values = vec![0.5; 19];
        values.push(0.65);
        let signal = detect_steam(&values, Some(&splits(20.0, 80.0)), SteamParams::default())
            .into_option()
            .unwrap();
        assert_eq!(signal.triggers.len(), 4);
        assert_eq!(signal.confidence, 1.0);
        assert!(signal.steam);
    }
}
