//! Core types and configuration for the omniscience odds analytics system.
//!
//! This crate provides shared types used across all other crates:
//! - Game, market and series types
//! - American odds conversion and vig normalization
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod odds;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use odds::NormalizedPair;
pub use types::*;
