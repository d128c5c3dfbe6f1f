//! Block-local parse failures.

use serde::Serialize;
use thiserror::Error;

/// Why a block contributed nothing to a parse result.
///
/// These never escape a parse call; they are collected into the report
/// next to the accepted records.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum BlockError {
    /// A positional line had fewer whitespace tokens than its grammar needs.
    #[error("line {line} has {found} tokens, expected at least {expected}")]
    TooFewTokens {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A splits block had fewer non-empty lines than required.
    #[error("block has {found} lines, expected at least {expected}")]
    TooFewLines { expected: usize, found: usize },

    /// No grammar exists for a block of this size.
    #[error("no grammar for a {0}-line block")]
    UnsupportedBlockSize(usize),

    /// The grammar for this block size is disabled by configuration.
    #[error("{0}-line blocks are disabled")]
    GrammarDisabled(usize),

    /// Lines left over after grouping that never formed a full block.
    #[error("{0} trailing lines do not form a block")]
    IncompleteBlock(usize),
}
