//! Analysis session.
//!
//! A [`Session`] owns one set of series buffers and wires the parser,
//! indicator engine, forecaster and recommendation engine around them.
//! Sessions are independent; nothing is shared between them.

use chrono::{DateTime, Utc};
use omni_core::{Config, Error, GameKey, Market, Result, SeriesKey, SplitsRecord};
use omni_features::IndicatorEngine;
use omni_ingestion::{parse_splits_feed, BlockMode, FeedParser, ParseReport, SeriesBuffer, SplitsReport};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::forecast::{forecast_ladder, DriftForecaster, Forecast, Forecaster};
use crate::recommendation::{Recommendation, RecommendationEngine};

/// Parse report plus one recommendation per accepted game.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub report: ParseReport,
    pub recommendations: Vec<Recommendation>,
}

/// Stateful analysis session over a stream of feed snapshots.
pub struct Session {
    config: Config,
    parser: FeedParser,
    buffers: SeriesBuffer,
    indicators: IndicatorEngine,
    recommender: RecommendationEngine,
    forecaster: Box<dyn Forecaster>,
    splits: HashMap<GameKey, SplitsRecord>,
}

impl Session {
    /// Validate `config` and build a session with the drift forecaster.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            parser: FeedParser::new(config.parser.clone()),
            buffers: SeriesBuffer::new(config.series.default_history_len),
            indicators: IndicatorEngine::new(config.indicators.clone()),
            recommender: RecommendationEngine::new(config.recommendation.clone()),
            forecaster: Box::new(DriftForecaster::from_config(&config.forecast)),
            splits: HashMap::new(),
            config,
        })
    }

    /// Replace the forecaster.
    pub fn with_forecaster(mut self, forecaster: impl Forecaster + 'static) -> Self {
        self.forecaster = Box::new(forecaster);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn buffers(&self) -> &SeriesBuffer {
        &self.buffers
    }

    /// Parse a feed snapshot and record every accepted game.
    pub fn ingest_feed(&mut self, text: &str, mode: BlockMode) -> ParseReport {
        self.ingest_feed_at(text, mode, Utc::now())
    }

    /// Parse a feed snapshot observed at `ts`.
    pub fn ingest_feed_at(&mut self, text: &str, mode: BlockMode, ts: DateTime<Utc>) -> ParseReport {
        let report = self.parser.parse_at(text, mode, ts);

        let observations: usize = report
            .accepted
            .iter()
            .map(|game| self.buffers.record(game, ts))
            .sum();

        info!(
            games = report.accepted.len(),
            skipped = report.skipped.len(),
            observations,
            series = self.buffers.series_count(),
            "Ingested feed snapshot"
        );
        report
    }

    /// Parse blank-line separated splits blocks.
    pub fn parse_splits(&self, text: &str) -> SplitsReport {
        parse_splits_feed(text, Utc::now())
    }

    /// Use `splits` for steam detection on `game`, replacing earlier splits.
    pub fn attach_splits(&mut self, game: GameKey, splits: SplitsRecord) {
        self.splits.insert(game, splits);
    }

    /// Recommendation for `game` from its current history.
    ///
    /// Fails with `InsufficientData` when the game has never been recorded.
    pub fn analyze(&self, game: &GameKey) -> Result<Recommendation> {
        self.analyze_at(game, Utc::now())
    }

    pub fn analyze_at(&self, game: &GameKey, now: DateTime<Utc>) -> Result<Recommendation> {
        let recorded = Market::ALL
            .into_iter()
            .any(|market| !self.buffers.read(&SeriesKey::new(game.clone(), market)).is_empty());
        if !recorded {
            return Err(Error::insufficient_data(format!("no history for game {game}")));
        }
        Ok(self.recommend_at(game, now))
    }

    /// Ingest a snapshot and recommend on every game it carried.
    ///
    /// A game whose block carried no usable odds still gets a recommendation,
    /// with no indicators and a Hold action.
    pub fn ingest_and_recommend(&mut self, text: &str, mode: BlockMode) -> SessionOutcome {
        self.ingest_and_recommend_at(text, mode, Utc::now())
    }

    pub fn ingest_and_recommend_at(
        &mut self,
        text: &str,
        mode: BlockMode,
        ts: DateTime<Utc>,
    ) -> SessionOutcome {
        let report = self.ingest_feed_at(text, mode, ts);

        let mut seen = Vec::new();
        let mut recommendations = Vec::new();
        for game in &report.accepted {
            if seen.contains(&game.key) {
                continue;
            }
            seen.push(game.key.clone());
            recommendations.push(self.recommend_at(&game.key, ts));
        }

        SessionOutcome {
            report,
            recommendations,
        }
    }

    fn recommend_at(&self, game: &GameKey, now: DateTime<Utc>) -> Recommendation {
        let splits = self.splits.get(game);
        let horizon = self.config.forecast.primary_horizon_minutes;

        let mut indicators = BTreeMap::new();
        let mut forecasts = BTreeMap::new();
        for market in Market::ALL {
            let series = self.buffers.read(&SeriesKey::new(game.clone(), market));
            if let Some(set) = self.indicators.aggregate(series, splits) {
                indicators.insert(market, set);
            }
            if market.has_points() {
                if let Some(forecast) = self.forecaster.forecast(series, horizon) {
                    forecasts.insert(market, forecast);
                }
            }
        }

        self.recommender.generate_at(game, indicators, forecasts, now)
    }

    /// Forecasts of one series at every configured horizon.
    pub fn forecast_ladder(&self, game: &GameKey, market: Market) -> Vec<Forecast> {
        let series = self.buffers.read(&SeriesKey::new(game.clone(), market));
        forecast_ladder(self.forecaster.as_ref(), series, &self.config.forecast.lmf_horizons)
    }

    /// Drop all recorded history and attached splits.
    pub fn clear_buffers(&mut self) {
        self.buffers.clear();
        self.splits.clear();
    }
}
