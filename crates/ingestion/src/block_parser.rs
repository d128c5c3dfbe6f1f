//! Odds feed parsing.
//!
//! Splits pasted feed text into fixed-size line blocks and maps each block
//! onto a [`GameRecord`] with one of two positional grammars:
//!
//! 5-line blocks (spread / total / moneyline):
//! 1. `date time favorite_team spread`
//! 2. spread vig
//! 3. total (`o45.5`, `u45.5` or `45.5`)
//! 4. total vig
//! 5. `away_ml home_ml`
//!
//! 4-line blocks (moneyline / total / runline):
//! 1. `date time away_ml home_ml total`
//! 2. total vig
//! 3. `label runline`
//! 4. runline vig
//!
//! Failures are block-local: a bad block is recorded in the
//! [`ParseReport`] and the rest of the feed still parses.

use chrono::{DateTime, Utc};
use omni_core::config::ParserConfig;
use omni_core::odds::{normalize_two_way, opposite_vig};
use omni_core::{
    BlockLayout, GameKey, GameRecord, Handicap, MoneylineQuote, RunlineQuote, SpreadQuote,
    TotalQuote, TotalSide,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::BlockError;
use crate::tokens::{extract_point, sanitize_odds, scan_odds};

/// How lines are grouped into blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockMode {
    /// Block size chosen from the enabled grammars.
    #[default]
    Auto,
    /// Every 5 lines form a block.
    FiveLine,
    /// Every 4 lines form a block.
    FourLine,
}

impl FromStr for BlockMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(BlockMode::Auto),
            "5line" | "five" | "5" => Ok(BlockMode::FiveLine),
            "4line" | "four" | "4" => Ok(BlockMode::FourLine),
            other => Err(format!("unknown block mode '{other}' (expected auto, 5line or 4line)")),
        }
    }
}

/// A block that produced no record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBlock {
    /// Position of the block within the feed (0-based).
    pub index: usize,
    /// Number of lines in the block.
    pub line_count: usize,
    pub error: BlockError,
}

/// Outcome of parsing one feed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseReport {
    pub accepted: Vec<GameRecord>,
    pub skipped: Vec<SkippedBlock>,
}

impl ParseReport {
    /// True when no block produced a record.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Parser for pasted odds feeds.
#[derive(Debug, Clone)]
pub struct FeedParser {
    config: ParserConfig,
}

impl FeedParser {
    /// Create a parser from configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a feed, stamping records with the current time.
    pub fn parse(&self, text: &str, mode: BlockMode) -> ParseReport {
        self.parse_at(text, mode, Utc::now())
    }

    /// Parse a feed, stamping records with `now`.
    pub fn parse_at(&self, text: &str, mode: BlockMode, now: DateTime<Utc>) -> ParseReport {
        let mut lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut report = ParseReport::default();
        if lines.is_empty() {
            return report;
        }
        if self.config.ignore_header_rows {
            lines.remove(0);
        }

        let (blocks, leftover) = self.group_blocks(&lines, mode);

        for (index, block) in blocks.iter().enumerate() {
            match self.parse_block(block, now) {
                Ok(record) => report.accepted.push(record),
                Err(error) => {
                    debug!(index, lines = block.len(), %error, "Skipping feed block");
                    report.skipped.push(SkippedBlock {
                        index,
                        line_count: block.len(),
                        error,
                    });
                }
            }
        }

        if let Some(count) = leftover {
            let error = BlockError::IncompleteBlock(count);
            debug!(index = blocks.len(), lines = count, %error, "Skipping feed block");
            report.skipped.push(SkippedBlock {
                index: blocks.len(),
                line_count: count,
                error,
            });
        }

        info!(
            accepted = report.accepted.len(),
            skipped = report.skipped.len(),
            ?mode,
            "Parsed odds feed"
        );
        report
    }

    /// Block size the grouper flushes at.
    fn expected_block_size(&self, mode: BlockMode) -> Option<usize> {
        match mode {
            BlockMode::FiveLine => Some(5),
            BlockMode::FourLine => Some(4),
            BlockMode::Auto => {
                // Lines arrive one at a time, so a 4-line grammar always
                // claims the block before it could reach 5 lines.
                if self.config.parse_4_line_blocks {
                    Some(4)
                } else if self.config.parse_5_line_blocks {
                    Some(5)
                } else {
                    None
                }
            }
        }
    }

    /// Greedily group lines into blocks.
    ///
    /// Returns the blocks and, if trailing lines could not form a block of
    /// a known size, how many lines were left over.
    fn group_blocks<'a>(&self, lines: &[&'a str], mode: BlockMode) -> (Vec<Vec<&'a str>>, Option<usize>) {
        let expect = self.expected_block_size(mode);
        let mut blocks = Vec::new();
        let mut current: Vec<&'a str> = Vec::new();

        for &line in lines {
            current.push(line);
            if Some(current.len()) == expect {
                blocks.push(std::mem::take(&mut current));
            }
        }

        let mut leftover = None;
        if matches!(current.len(), 4 | 5) {
            blocks.push(current);
        } else if !current.is_empty() {
            leftover = Some(current.len());
        }

        (blocks, leftover)
    }

    /// Map a single block by its size.
    pub fn parse_block(&self, block: &[&str], now: DateTime<Utc>) -> Result<GameRecord, BlockError> {
        match block.len() {
            5 if self.config.parse_5_line_blocks => parse_five_line(block, now),
            4 if self.config.parse_4_line_blocks => parse_four_line(block, now),
            n @ (4 | 5) => Err(BlockError::GrammarDisabled(n)),
            n => Err(BlockError::UnsupportedBlockSize(n)),
        }
    }
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

fn tokens_at_least<'a>(line: &'a str, line_no: usize, expected: usize) -> Result<Vec<&'a str>, BlockError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < expected {
        return Err(BlockError::TooFewTokens {
            line: line_no,
            expected,
            found: tokens.len(),
        });
    }
    Ok(tokens)
}

/// Split a total token into its optional over/under side and point value.
fn parse_total_token(token: &str) -> (Option<TotalSide>, Option<f64>) {
    let token = token.trim();
    let mut chars = token.chars();
    let side = match chars.next() {
        Some(c) if token.chars().count() >= 2 => match c.to_ascii_lowercase() {
            'o' => Some(TotalSide::Over),
            'u' => Some(TotalSide::Under),
            _ => None,
        },
        _ => None,
    };

    match side {
        Some(side) => (Some(side), extract_point(chars.as_str())),
        None => (None, extract_point(token)),
    }
}

fn total_quote(token: &str, vig_line: &str) -> TotalQuote {
    let (side, points) = parse_total_token(token);
    let vig = sanitize_odds(vig_line);
    let vig_opp = opposite_vig(vig);
    let pair = normalize_two_way(vig, vig_opp);

    TotalQuote {
        points,
        side,
        vig,
        vig_opp,
        over_prob: pair.first,
        under_prob: pair.second,
    }
}

fn parse_five_line(block: &[&str], now: DateTime<Utc>) -> Result<GameRecord, BlockError> {
    let t1 = tokens_at_least(block[0], 1, 4)?;
    let (date, time, favorite_team) = (t1[0], t1[1], t1[2]);

    let spread_vig = sanitize_odds(block[1]);
    let spread_vig_opp = opposite_vig(spread_vig);
    let spread_pair = normalize_two_way(spread_vig, spread_vig_opp);

    let total = total_quote(block[2], block[3]);

    let ml = scan_odds(block[4]);
    if ml.len() < 2 {
        warn!(line = block[4], found = ml.len(), "Moneyline line has fewer than two odds");
    }
    let away_ml = ml.first().copied().flatten();
    let home_ml = ml.get(1).copied().flatten();

    Ok(GameRecord {
        key: GameKey::FiveLine {
            date: date.to_string(),
            time: time.to_string(),
            favorite_team: favorite_team.to_string(),
        },
        date: date.to_string(),
        time: time.to_string(),
        layout: BlockLayout::FiveLine,
        moneyline: MoneylineQuote::new(away_ml, home_ml, normalize_two_way(away_ml, home_ml)),
        total,
        handicap: Handicap::Spread(SpreadQuote {
            favorite_team: favorite_team.to_string(),
            points: extract_point(t1[3]),
            vig: spread_vig,
            vig_opp: spread_vig_opp,
            favorite_prob: spread_pair.first,
            dog_prob: spread_pair.second,
        }),
        parsed_at: now,
    })
}

fn parse_four_line(block: &[&str], now: DateTime<Utc>) -> Result<GameRecord, BlockError> {
    let t1 = tokens_at_least(block[0], 1, 5)?;
    let (date, time) = (t1[0], t1[1]);
    let away_ml = sanitize_odds(t1[2]);
    let home_ml = sanitize_odds(t1[3]);

    let total = total_quote(t1[4], block[1]);

    let rtokens: Vec<&str> = block[2].split_whitespace().collect();
    let label = rtokens.first().copied().unwrap_or_default();
    let runline_points = rtokens.get(1).and_then(|t| extract_point(t));
    let runline_vig = sanitize_odds(block[3]);
    let runline_vig_opp = opposite_vig(runline_vig);
    let runline_pair = normalize_two_way(runline_vig, runline_vig_opp);

    Ok(GameRecord {
        key: GameKey::FourLine {
            date: date.to_string(),
            time: time.to_string(),
            away_ml,
            home_ml,
        },
        date: date.to_string(),
        time: time.to_string(),
        layout: BlockLayout::FourLine,
        moneyline: MoneylineQuote::new(away_ml, home_ml, normalize_two_way(away_ml, home_ml)),
        total,
        handicap: Handicap::Runline(RunlineQuote {
            label: label.to_string(),
            points: runline_points,
            vig: runline_vig,
            vig_opp: runline_vig_opp,
            runline_prob: runline_pair.first,
            opposite_prob: runline_pair.second,
        }),
        parsed_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const FIVE_LINE: &str = "01/01 7:00pm TeamA -3.5\n-110\no45.5\n-110\n-150 +130";
    const FOUR_LINE: &str = "09/14 1:05pm -135 +115 o8.5\n-110\nNYY -1.5\n+140";

    fn parser(ignore_header: bool) -> FeedParser {
        FeedParser::new(ParserConfig {
            ignore_header_rows: ignore_header,
            ..ParserConfig::default()
        })
    }

    fn spread(record: &GameRecord) -> &SpreadQuote {
        match &record.handicap {
            Handicap::Spread(s) => s,
            Handicap::Runline(_) => panic!("expected a spread"),
        }
    }

    #[test]
    fn test_five_line_block() {
        let report = parser(false).parse(FIVE_LINE, BlockMode::FiveLine);
        assert_eq!(report.accepted.len(), 1);
        assert!(report.skipped.is_empty());

        let game = &report.accepted[0];
        assert_eq!(game.layout, BlockLayout::FiveLine);
        assert_eq!(game.date, "01/01");
        assert_eq!(game.time, "7:00pm");

        let s = spread(game);
        assert_eq!(s.favorite_team, "TeamA");
        assert_eq!(s.points, Some(-3.5));
        assert_eq!(s.vig, Some(-110));
        assert_eq!(s.vig_opp, Some(-110));
        assert_eq!(s.favorite_prob, Some(0.5));

        assert_eq!(game.total.points, Some(45.5));
        assert_eq!(game.total.side, Some(TotalSide::Over));

        assert_eq!(game.moneyline.away_ml, Some(-150));
        assert_eq!(game.moneyline.home_ml, Some(130));
        let sum = game.moneyline.away_prob.unwrap() + game.moneyline.home_prob.unwrap();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);

        assert_eq!(
            game.key,
            GameKey::FiveLine {
                date: "01/01".to_string(),
                time: "7:00pm".to_string(),
                favorite_team: "TeamA".to_string(),
            }
        );
    }

    #[test]
    fn test_four_line_block() {
        let report = parser(false).parse(FOUR_LINE, BlockMode::FourLine);
        assert_eq!(report.accepted.len(), 1);

        let game = &report.accepted[0];
        assert_eq!(game.layout, BlockLayout::FourLine);
        assert_eq!(game.moneyline.away_ml, Some(-135));
        assert_eq!(game.moneyline.home_ml, Some(115));
        assert_eq!(game.total.points, Some(8.5));
        assert_eq!(game.total.vig, Some(-110));

        match &game.handicap {
            Handicap::Runline(r) => {
                assert_eq!(r.label, "NYY");
                assert_eq!(r.points, Some(-1.5));
                assert_eq!(r.vig, Some(140));
                assert_eq!(r.vig_opp, Some(-360));
                let sum = r.runline_prob.unwrap() + r.opposite_prob.unwrap();
                assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
            }
            Handicap::Spread(_) => panic!("expected a runline"),
        }

        assert_eq!(game.key.to_string(), "09/14|1:05pm|-135|115");
    }

    #[test]
    fn test_header_row_dropped() {
        let feed = format!("Date Time Team Spread\n{FIVE_LINE}");
        let report = parser(true).parse(&feed, BlockMode::FiveLine);
        assert_eq!(report.accepted.len(), 1);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let feed = "\n01/01 7:00pm TeamA -3.5\n\n  -110  \n\no45.5\n-110\n\n-150 +130\n\n";
        let report = parser(false).parse(feed, BlockMode::FiveLine);
        assert_eq!(report.accepted.len(), 1);
    }

    #[test]
    fn test_multiple_blocks() {
        let second = "01/01 8:30pm TeamB -7\neven\nu51\n-105\n+240 -300";
        let feed = format!("{FIVE_LINE}\n{second}");
        let report = parser(false).parse(&feed, BlockMode::FiveLine);
        assert_eq!(report.accepted.len(), 2);

        let b = &report.accepted[1];
        assert_eq!(spread(b).vig, Some(100));
        assert_eq!(spread(b).vig_opp, Some(-320));
        assert_eq!(b.total.side, Some(TotalSide::Under));
        assert_eq!(b.total.points, Some(51.0));
        assert_eq!(b.moneyline.away_ml, Some(240));
    }

    #[test]
    fn test_six_line_block_rejected() {
        let lines = ["01/01 7:00pm TeamA -3.5", "-110", "o45.5", "-110", "-150 +130", "extra"];
        let result = parser(false).parse_block(&lines, Utc::now());
        assert_eq!(result, Err(BlockError::UnsupportedBlockSize(6)));
    }

    #[test]
    fn test_leftover_lines_reported() {
        let feed = format!("{FIVE_LINE}\nstray line");
        let report = parser(false).parse(&feed, BlockMode::FiveLine);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].error, BlockError::IncompleteBlock(1));
        assert_eq!(report.skipped[0].index, 1);
    }

    #[test]
    fn test_trailing_four_lines_use_four_line_grammar() {
        let feed = format!("{FIVE_LINE}\n{FOUR_LINE}");
        let report = parser(false).parse(&feed, BlockMode::FiveLine);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.accepted[1].layout, BlockLayout::FourLine);
    }

    #[test]
    fn test_auto_mode_prefers_four_line_blocks() {
        let report = parser(false).parse(FOUR_LINE, BlockMode::Auto);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].layout, BlockLayout::FourLine);

        let five_only = FeedParser::new(ParserConfig {
            ignore_header_rows: false,
            parse_5_line_blocks: true,
            parse_4_line_blocks: false,
        });
        let report = five_only.parse(FIVE_LINE, BlockMode::Auto);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].layout, BlockLayout::FiveLine);
    }

    #[test]
    fn test_disabled_grammar_skips_block() {
        let parser = FeedParser::new(ParserConfig {
            ignore_header_rows: false,
            parse_5_line_blocks: false,
            parse_4_line_blocks: true,
        });
        let report = parser.parse(FIVE_LINE, BlockMode::FiveLine);
        assert!(report.is_empty());
        assert_eq!(report.skipped[0].error, BlockError::GrammarDisabled(5));
    }

    #[test]
    fn test_malformed_block_does_not_stop_feed() {
        let bad = "garbage\n-110\no45.5\n-110\n-150 +130";
        let feed = format!("{bad}\n{FIVE_LINE}");
        let report = parser(false).parse(&feed, BlockMode::FiveLine);

        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(
            report.skipped[0].error,
            BlockError::TooFewTokens {
                line: 1,
                expected: 4,
                found: 1
            }
        );
    }

    #[test]
    fn test_missing_home_moneyline() {
        let feed = "01/01 7:00pm TeamA -3.5\n-110\n45.5\n-110\n-150";
        let report = parser(false).parse(feed, BlockMode::FiveLine);
        let game = &report.accepted[0];

        assert_eq!(game.total.side, None);
        assert_eq!(game.total.points, Some(45.5));
        assert_eq!(game.moneyline.home_ml, None);
        assert_eq!(game.moneyline.away_prob, Some(1.0));
    }

    #[test]
    fn test_overflowing_away_moneyline_keeps_home_in_place() {
        let feed = "01/01 7:00pm TeamA -3.5\n-110\no45.5\n-110\n99999999999 +130";
        let report = parser(false).parse(feed, BlockMode::FiveLine);
        let game = &report.accepted[0];

        assert_eq!(game.moneyline.away_ml, None);
        assert_eq!(game.moneyline.home_ml, Some(130));
    }

    #[test]
    fn test_empty_feed() {
        let report = parser(true).parse("\n   \n", BlockMode::Auto);
        assert!(report.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_block_mode_from_str() {
        assert_eq!("5line".parse::<BlockMode>(), Ok(BlockMode::FiveLine));
        assert_eq!("4LINE".parse::<BlockMode>(), Ok(BlockMode::FourLine));
        assert_eq!("auto".parse::<BlockMode>(), Ok(BlockMode::Auto));
        assert!("7line".parse::<BlockMode>().is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = parser(false).parse(FIVE_LINE, BlockMode::FiveLine);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["accepted"][0]["key"]["layout"], "five_line");
        assert_eq!(json["accepted"][0]["handicap"]["kind"], "spread");
    }
}
