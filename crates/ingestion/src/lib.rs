//! Feed ingestion and normalization for the omniscience system.
//!
//! This crate handles:
//! - Odds token sanitizing
//! - Block grouping and the 5-line / 4-line feed grammars
//! - Betting splits blocks
//! - Bounded per-market series buffers

pub mod block_parser;
pub mod error;
pub mod series_buffer;
pub mod splits;
pub mod tokens;

pub use block_parser::{BlockMode, FeedParser, ParseReport, SkippedBlock};
pub use error::BlockError;
pub use series_buffer::SeriesBuffer;
pub use splits::{parse_splits_block, parse_splits_feed, SplitsReport};
