//! American odds conversion and two-way vig normalization.

use crate::types::AmericanOdds;
use serde::{Deserialize, Serialize};

/// Juice assumed on the unseen side of a symmetric two-way market
/// (-110/-110 style): the two vigs always sum to this value.
pub const SYMMETRIC_VIG_SUM: AmericanOdds = -220;

/// Implied probabilities for both outcomes of a two-way market.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPair {
    pub first: Option<f64>,
    pub second: Option<f64>,
}

impl NormalizedPair {
    /// Sum of both sides, when both are present.
    pub fn sum(&self) -> Option<f64> {
        Some(self.first? + self.second?)
    }
}

/// Convert American odds to an implied probability, vig included.
#[inline]
pub fn american_to_probability(odds: Option<AmericanOdds>) -> Option<f64> {
    let odds = f64::from(odds?);
    if odds > 0.0 {
        Some(100.0 / (odds + 100.0))
    } else {
        Some(odds.abs() / (odds.abs() + 100.0))
    }
}

/// Remove the vig from a two-way market.
///
/// A missing side counts as a raw probability of zero, so a single present
/// side normalizes to 1.0 against 0.0. Only when the combined raw
/// probability is zero does the present side come back un-normalized,
/// paired with `None`.
pub fn normalize_two_way(a: Option<AmericanOdds>, b: Option<AmericanOdds>) -> NormalizedPair {
    if a.is_none() && b.is_none() {
        return NormalizedPair::default();
    }

    let a_raw = american_to_probability(a).unwrap_or(0.0);
    let b_raw = american_to_probability(b).unwrap_or(0.0);
    let total = a_raw + b_raw;

    if total == 0.0 {
        return if b.is_none() {
            NormalizedPair {
                first: Some(a_raw),
                second: None,
            }
        } else {
            NormalizedPair {
                first: None,
                second: Some(b_raw),
            }
        };
    }

    NormalizedPair {
        first: Some(a_raw / total),
        second: Some(b_raw / total),
    }
}

/// Vig on the other side of a symmetric market.
#[inline]
pub fn opposite_vig(vig: Option<AmericanOdds>) -> Option<AmericanOdds> {
    vig.map(|v| SYMMETRIC_VIG_SUM - v)
}
