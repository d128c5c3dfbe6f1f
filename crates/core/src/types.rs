//! Core data types for the omniscience system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::odds::NormalizedPair;

/// Signed American odds (e.g. -150, +130). "even" is +100.
pub type AmericanOdds = i32;

/// A two-outcome market tracked as its own series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    AwayMl,
    HomeMl,
    Spread,
    Total,
}

impl Market {
    /// All markets, in output order.
    pub const ALL: [Market; 4] = [Market::AwayMl, Market::HomeMl, Market::Spread, Market::Total];

    pub fn as_str(self) -> &'static str {
        match self {
            Market::AwayMl => "away_ml",
            Market::HomeMl => "home_ml",
            Market::Spread => "spread",
            Market::Total => "total",
        }
    }

    /// Markets whose series carry point values.
    pub fn has_points(self) -> bool {
        matches!(self, Market::Spread | Market::Total)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a game, built from the stable tokens of the block it was
/// parsed from.
///
/// The two block layouts produce different key shapes. Equality compares
/// the variant as well as the fields, so a 5-line key never equals a
/// 4-line key even if their rendered forms coincide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum GameKey {
    FiveLine {
        date: String,
        time: String,
        favorite_team: String,
    },
    FourLine {
        date: String,
        time: String,
        away_ml: Option<AmericanOdds>,
        home_ml: Option<AmericanOdds>,
    },
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn odds(o: &Option<AmericanOdds>) -> String {
            o.map(|v| v.to_string()).unwrap_or_else(|| "None".to_string())
        }

        match self {
            GameKey::FiveLine { date, time, favorite_team } => {
                write!(f, "{date}|{time}|{favorite_team}")
            }
            GameKey::FourLine { date, time, away_ml, home_ml } => {
                write!(f, "{date}|{time}|{}|{}", odds(away_ml), odds(home_ml))
            }
        }
    }
}

/// Key of a rolling series: one market of one game.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub game: GameKey,
    pub market: Market,
}

impl SeriesKey {
    pub fn new(game: GameKey, market: Market) -> Self {
        Self { game, market }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.game, self.market)
    }
}

/// Which grammar produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockLayout {
    FiveLine,
    FourLine,
}

impl BlockLayout {
    /// Number of lines in a block of this layout.
    pub fn line_count(self) -> usize {
        match self {
            BlockLayout::FiveLine => 5,
            BlockLayout::FourLine => 4,
        }
    }
}

/// Side marked on a total token (`o45.5` / `u45.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSide {
    Over,
    Under,
}

/// Moneyline odds with vig-free probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneylineQuote {
    pub away_ml: Option<AmericanOdds>,
    pub home_ml: Option<AmericanOdds>,
    pub away_prob: Option<f64>,
    pub home_prob: Option<f64>,
}

impl MoneylineQuote {
    pub fn new(away_ml: Option<AmericanOdds>, home_ml: Option<AmericanOdds>, pair: NormalizedPair) -> Self {
        Self {
            away_ml,
            home_ml,
            away_prob: pair.first,
            home_prob: pair.second,
        }
    }
}

/// Total (over/under) line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalQuote {
    pub points: Option<f64>,
    pub side: Option<TotalSide>,
    pub vig: Option<AmericanOdds>,
    pub vig_opp: Option<AmericanOdds>,
    pub over_prob: Option<f64>,
    pub under_prob: Option<f64>,
}

/// Point spread quoted against the favorite (5-line blocks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadQuote {
    pub favorite_team: String,
    pub points: Option<f64>,
    pub vig: Option<AmericanOdds>,
    pub vig_opp: Option<AmericanOdds>,
    pub favorite_prob: Option<f64>,
    pub dog_prob: Option<f64>,
}

/// Runline (4-line blocks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunlineQuote {
    pub label: String,
    pub points: Option<f64>,
    pub vig: Option<AmericanOdds>,
    pub vig_opp: Option<AmericanOdds>,
    pub runline_prob: Option<f64>,
    pub opposite_prob: Option<f64>,
}

/// The point-handicap market of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Handicap {
    Spread(SpreadQuote),
    Runline(RunlineQuote),
}

impl Handicap {
    /// Probability and point value tracked for the spread series.
    pub fn observation(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Handicap::Spread(s) => (s.favorite_prob, s.points),
            Handicap::Runline(r) => (r.runline_prob, r.points),
        }
    }
}

/// A normalized game snapshot parsed from one feed block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub key: GameKey,
    pub date: String,
    pub time: String,
    pub layout: BlockLayout,
    pub moneyline: MoneylineQuote,
    pub total: TotalQuote,
    pub handicap: Handicap,
    pub parsed_at: DateTime<Utc>,
}

impl GameRecord {
    /// Probability and optional point value to record for `market`.
    ///
    /// `None` when the block carried no probability for that market.
    pub fn observation(&self, market: Market) -> Option<(f64, Option<f64>)> {
        let (prob, point) = match market {
            Market::AwayMl => (self.moneyline.away_prob, None),
            Market::HomeMl => (self.moneyline.home_prob, None),
            Market::Spread => self.handicap.observation(),
            Market::Total => (self.total.over_prob, self.total.points),
        };
        prob.map(|p| (p, point))
    }
}

/// Public betting splits for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitsRecord {
    pub away_bet_pct: Option<f64>,
    pub home_bet_pct: Option<f64>,
    pub away_money_pct: Option<f64>,
    pub home_money_pct: Option<f64>,
    pub parsed_at: DateTime<Utc>,
}

impl SplitsRecord {
    /// Larger of the two money percentages, missing sides counted as 0.
    pub fn max_money_pct(&self) -> f64 {
        self.away_money_pct
            .unwrap_or(0.0)
            .max(self.home_money_pct.unwrap_or(0.0))
    }
}

/// One observation in a rolling series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub implied_probability: f64,
    pub point: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl SeriesPoint {
    pub fn new(implied_probability: f64, point: Option<f64>, timestamp: DateTime<Utc>) -> Self {
        Self {
            implied_probability,
            point,
            timestamp,
        }
    }
}

/// Result of an indicator over a window.
///
/// Indicators never extrapolate: a window that is too short yields
/// `Insufficient` with the sample count seen and required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorValue<T = f64> {
    Available(T),
    Insufficient { have: usize, required: usize },
}

impl<T> IndicatorValue<T> {
    pub fn insufficient(have: usize, required: usize) -> Self {
        IndicatorValue::Insufficient { have, required }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, IndicatorValue::Available(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            IndicatorValue::Available(v) => Some(v),
            IndicatorValue::Insufficient { .. } => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            IndicatorValue::Available(v) => Some(v),
            IndicatorValue::Insufficient { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> IndicatorValue<U> {
        match self {
            IndicatorValue::Available(v) => IndicatorValue::Available(f(v)),
            IndicatorValue::Insufficient { have, required } => {
                IndicatorValue::Insufficient { have, required }
            }
        }
    }
}

impl<T: Copy> IndicatorValue<T> {
    /// The value, if available.
    #[inline]
    pub fn get(&self) -> Option<T> {
        self.as_ref().copied()
    }
}

/// Recommended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Take the side the signals point to.
    Back,
    /// Take the other side.
    Fade,
    /// Do nothing.
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Back => "Back",
            Action::Fade => "Fade",
            Action::Hold => "Hold",
        };
        f.write_str(s)
    }
}
