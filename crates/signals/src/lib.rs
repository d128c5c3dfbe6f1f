//! Forecasting, recommendations and session orchestration.
//!
//! This crate handles:
//! - Point-move forecasting behind a pluggable `Forecaster` trait
//! - Scoring indicator snapshots into Back / Fade / Hold recommendations
//! - The session that ties parsing, buffering and analysis together

pub mod forecast;
pub mod recommendation;
pub mod session;

pub use forecast::{forecast_ladder, DriftForecaster, Forecast, Forecaster};
pub use recommendation::{Recommendation, RecommendationEngine, Trigger};
pub use session::{Session, SessionOutcome};
