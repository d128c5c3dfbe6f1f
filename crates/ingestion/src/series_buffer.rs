//! Bounded rolling history per (game, market).
//!
//! Each series keeps at most `capacity` observations; appending past that
//! drops the oldest first and keeps insertion order.

use chrono::{DateTime, Utc};
use omni_core::{GameRecord, Market, SeriesKey, SeriesPoint};
use std::collections::HashMap;
use tracing::debug;

/// Rolling observation buffers for one session.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    /// Observations by series, oldest first.
    series: HashMap<SeriesKey, Vec<SeriesPoint>>,
    /// Maximum observations kept per series.
    capacity: usize,
}

impl SeriesBuffer {
    /// Create an empty buffer set with the given per-series capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            series: HashMap::new(),
            capacity,
        }
    }

    /// Append an observation, evicting the oldest beyond capacity.
    pub fn append(&mut self, key: SeriesKey, point: SeriesPoint) {
        let history = self.series.entry(key).or_default();
        history.push(point);

        if history.len() > self.capacity {
            let excess = history.len() - self.capacity;
            history.drain(0..excess);
            debug!(evicted = excess, capacity = self.capacity, "Series at capacity");
        }
    }

    /// Full ordered history of a series, empty if never observed.
    pub fn read(&self, key: &SeriesKey) -> &[SeriesPoint] {
        self.series.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record every market a parsed game carries a probability for.
    ///
    /// Returns the number of observations appended.
    pub fn record(&mut self, game: &GameRecord, ts: DateTime<Utc>) -> usize {
        let mut appended = 0;
        for market in Market::ALL {
            if let Some((prob, point)) = game.observation(market) {
                self.append(
                    SeriesKey::new(game.key.clone(), market),
                    SeriesPoint::new(prob, point, ts),
                );
                appended += 1;
            }
        }
        debug!(game = %game.key, appended, "Recorded game observations");
        appended
    }

    /// Number of series with at least one observation.
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Per-series capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every series.
    pub fn clear(&mut self) {
        self.series.clear();
    }
}

impl Default for SeriesBuffer {
    fn default() -> Self {
        Self::new(300)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_parser::{BlockMode, FeedParser};
    use chrono::Duration;
    use omni_core::config::ParserConfig;
    use omni_core::GameKey;

    fn key(market: Market) -> SeriesKey {
        SeriesKey::new(
            GameKey::FiveLine {
                date: "01/01".to_string(),
                time: "7:00pm".to_string(),
                favorite_team: "TeamA".to_string(),
            },
            market,
        )
    }

    fn point(prob: f64) -> SeriesPoint {
        SeriesPoint::new(prob, None, Utc::now())
    }

    #[test]
    fn test_unseen_key_is_empty() {
        let buffer = SeriesBuffer::new(10);
        assert!(buffer.read(&key(Market::Spread)).is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut buffer = SeriesBuffer::new(10);
        for i in 0..5 {
            buffer.append(key(Market::Spread), point(i as f64 / 10.0));
        }

        let probs: Vec<f64> = buffer
            .read(&key(Market::Spread))
            .iter()
            .map(|p| p.implied_probability)
            .collect();
        assert_eq!(probs, vec![0.0, 0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut buffer = SeriesBuffer::new(3);
        for i in 0..10 {
            buffer.append(key(Market::Total), point(i as f64));
        }

        let history = buffer.read(&key(Market::Total));
        assert_eq!(history.len(), 3);
        let probs: Vec<f64> = history.iter().map(|p| p.implied_probability).collect();
        assert_eq!(probs, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_series_are_independent() {
        let mut buffer = SeriesBuffer::new(5);
        buffer.append(key(Market::AwayMl), point(0.6));
        buffer.append(key(Market::HomeMl), point(0.4));
        buffer.append(key(Market::HomeMl), point(0.41));

        assert_eq!(buffer.read(&key(Market::AwayMl)).len(), 1);
        assert_eq!(buffer.read(&key(Market::HomeMl)).len(), 2);
        assert_eq!(buffer.series_count(), 2);

        buffer.clear();
        assert_eq!(buffer.series_count(), 0);
    }

    #[test]
    fn test_record_game_markets() {
        let parser = FeedParser::new(ParserConfig {
            ignore_header_rows: false,
            ..ParserConfig::default()
        });
        let report = parser.parse(
            "01/01 7:00pm TeamA -3.5\n-110\no45.5\n-110\n-150 +130",
            BlockMode::FiveLine,
        );
        let game = &report.accepted[0];

        let mut buffer = SeriesBuffer::new(300);
        let t0 = Utc::now();
        assert_eq!(buffer.record(game, t0), 4);
        assert_eq!(buffer.record(game, t0 + Duration::minutes(5)), 4);

        let spread = buffer.read(&key(Market::Spread));
        assert_eq!(spread.len(), 2);
        assert_eq!(spread[0].point, Some(-3.5));
        assert_eq!(spread[0].implied_probability, 0.5);

        let total = buffer.read(&key(Market::Total));
        assert_eq!(total[1].point, Some(45.5));

        let away = buffer.read(&key(Market::AwayMl));
        assert_eq!(away[0].point, None);
        assert!((away[0].implied_probability - 0.6 / (0.6 + 100.0 / 230.0)).abs() < 1e-12);
    }
}
