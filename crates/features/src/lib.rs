//! Indicator computation for the omniscience system.
//!
//! This crate handles:
//! - Momentum (velocity / acceleration)
//! - Oscillators (RSI, z-score)
//! - Moving averages (SMA, EMA, adaptive)
//! - Volatility measures (Bollinger width, ATR, implied volatility)
//! - Fibonacci levels on point values
//! - Steam move detection and greeks-style sensitivities
//! - Aggregation of all of the above into one snapshot per series

pub mod engine;
pub mod fibonacci;
pub mod greeks;
pub mod momentum;
pub mod moving_average;
pub mod oscillators;
pub mod stats;
pub mod steam;
pub mod volatility;

pub use engine::{IndicatorEngine, IndicatorSet};
pub use fibonacci::{FibLevel, FibonacciLevels};
pub use greeks::Greeks;
pub use momentum::Momentum;
pub use steam::{SteamSignal, SteamTrigger};
