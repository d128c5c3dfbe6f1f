//! Recommendation scoring.
//!
//! Folds per-market indicator snapshots and forecasts into one score,
//! maps it onto a confidence, and picks an action and stake.

use chrono::{DateTime, Utc};
use omni_core::config::RecommendationConfig;
use omni_core::{Action, GameKey, Market};
use omni_features::stats::sign;
use omni_features::IndicatorSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::forecast::Forecast;

const SPREAD_MOMENTUM_SCALE: f64 = 100.0;
const SPREAD_MOMENTUM_CAP: f64 = 0.5;
const STEAM_WEIGHT: f64 = 0.3;
const MONEYLINE_MOMENTUM_SCALE: f64 = 120.0;
const MONEYLINE_MOMENTUM_CAP: f64 = 0.4;
const FORECAST_MIN_MOVE: f64 = 0.3;
const FORECAST_MIN_CONFIDENCE: f64 = 0.6;
const FORECAST_WEIGHT: f64 = 0.2;
const MIN_CONFIDENCE: f64 = 0.05;
const MAX_CONFIDENCE: f64 = 0.95;
const FADE_MARGIN: f64 = 0.1;
const EDGE_PER_CONFIDENCE: f64 = 0.12;
const KELLY_DIVISOR: f64 = 0.05;

/// Signal that moved the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    SpreadMomentum,
    Steam,
    MoneylineMomentum(Market),
}

/// Action and sizing for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub game: GameKey,
    pub action: Action,
    /// Clamped to [0.05, 0.95].
    pub confidence: f64,
    pub expected_value: f64,
    pub kelly_stake: f64,
    /// Raw score before the 0.5 offset and clamp.
    pub score: f64,
    pub triggers: Vec<Trigger>,
    pub narrative: Vec<String>,
    pub indicators: BTreeMap<Market, IndicatorSet>,
    pub forecasts: BTreeMap<Market, Forecast>,
    pub generated_at: DateTime<Utc>,
}

/// Scores snapshots with fixed thresholds.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    /// Generate a recommendation stamped with the current time.
    pub fn generate(
        &self,
        game: &GameKey,
        indicators: BTreeMap<Market, IndicatorSet>,
        forecasts: BTreeMap<Market, Forecast>,
    ) -> Recommendation {
        self.generate_at(game, indicators, forecasts, Utc::now())
    }

    pub fn generate_at(
        &self,
        game: &GameKey,
        indicators: BTreeMap<Market, IndicatorSet>,
        forecasts: BTreeMap<Market, Forecast>,
        now: DateTime<Utc>,
    ) -> Recommendation {
        let mut score = 0.0;
        let mut triggers = Vec::new();
        let mut narrative = Vec::new();

        if let Some(spread) = indicators.get(&Market::Spread) {
            if let Some(mom_v) = spread.mom_v() {
                score += sign(mom_v) * (mom_v.abs() * SPREAD_MOMENTUM_SCALE).min(SPREAD_MOMENTUM_CAP);
                narrative.push(format!("Spread MOM-V: {mom_v:.6}"));
                triggers.push(Trigger::SpreadMomentum);
            }
            if let Some(conf) = spread.steam_confidence() {
                score += STEAM_WEIGHT * conf;
                narrative.push(format!("Steam detected (conf {conf:.2})"));
                triggers.push(Trigger::Steam);
            }
        }

        for market in [Market::AwayMl, Market::HomeMl] {
            let Some(mom_v) = indicators.get(&market).and_then(IndicatorSet::mom_v) else {
                continue;
            };
            if mom_v != 0.0 {
                score += sign(mom_v)
                    * (mom_v.abs() * MONEYLINE_MOMENTUM_SCALE).min(MONEYLINE_MOMENTUM_CAP);
                triggers.push(Trigger::MoneylineMomentum(market));
            }
        }

        for (market, forecast) in &forecasts {
            let mv = forecast.projected_point_move;
            if mv.abs() > FORECAST_MIN_MOVE && forecast.confidence > FORECAST_MIN_CONFIDENCE {
                score += FORECAST_WEIGHT * sign(mv);
                narrative.push(format!(
                    "Forecast {market}: move {mv:.2} pts (conf {:.2})",
                    forecast.confidence
                ));
            }
        }

        let confidence = (0.5 + score).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
        let action = self.action_for(confidence);
        let expected_value = (confidence - 0.5) * EDGE_PER_CONFIDENCE;
        let kelly_stake = (expected_value / KELLY_DIVISOR).clamp(0.0, self.config.kelly_fraction_cap);

        info!(
            game = %game,
            %action,
            confidence,
            triggers = triggers.len(),
            "Generated recommendation"
        );

        Recommendation {
            game: game.clone(),
            action,
            confidence,
            expected_value,
            kelly_stake,
            score,
            triggers,
            narrative,
            indicators,
            forecasts,
            generated_at: now,
        }
    }

    fn action_for(&self, confidence: f64) -> Action {
        if confidence >= self.config.strong_confidence_threshold {
            Action::Back
        } else if confidence <= self.config.min_confidence_for_action - FADE_MARGIN {
            Action::Fade
        } else {
            Action::Hold
        }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(RecommendationConfig::default())
    }
}
