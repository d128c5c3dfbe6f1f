//! Betting splits parsing.
//!
//! A splits block is at least seven non-empty lines. The first three
//! (matchup / labels) are ignored; lines 4-7 hold away bet %, home bet %,
//! away money % and home money %.

use chrono::{DateTime, Utc};
use omni_core::SplitsRecord;
use serde::Serialize;
use tracing::{debug, info};

use crate::block_parser::SkippedBlock;
use crate::error::BlockError;
use crate::tokens::parse_percentage;

/// Minimum non-empty lines in a splits block.
pub const SPLITS_MIN_LINES: usize = 7;

/// Outcome of parsing a batch of splits blocks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SplitsReport {
    pub accepted: Vec<SplitsRecord>,
    pub skipped: Vec<SkippedBlock>,
}

/// Parse one splits block.
pub fn parse_splits_block(text: &str, now: DateTime<Utc>) -> Result<SplitsRecord, BlockError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < SPLITS_MIN_LINES {
        return Err(BlockError::TooFewLines {
            expected: SPLITS_MIN_LINES,
            found: lines.len(),
        });
    }

    Ok(SplitsRecord {
        away_bet_pct: parse_percentage(lines[3]),
        home_bet_pct: parse_percentage(lines[4]),
        away_money_pct: parse_percentage(lines[5]),
        home_money_pct: parse_percentage(lines[6]),
        parsed_at: now,
    })
}

/// Parse blank-line separated splits blocks.
pub fn parse_splits_feed(text: &str, now: DateTime<Utc>) -> SplitsReport {
    let mut report = SplitsReport::default();

    for (index, block) in split_on_blank_lines(text).into_iter().enumerate() {
        match parse_splits_block(&block, now) {
            Ok(record) => report.accepted.push(record),
            Err(error) => {
                let line_count = block.lines().count();
                debug!(index, lines = line_count, %error, "Skipping splits block");
                report.skipped.push(SkippedBlock {
                    index,
                    line_count,
                    error,
                });
            }
        }
    }

    info!(
        accepted = report.accepted.len(),
        skipped = report.skipped.len(),
        "Parsed splits feed"
    );
    report
}

/// Group consecutive non-blank lines into blocks.
fn split_on_blank_lines(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}
