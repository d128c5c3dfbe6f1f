//! Token sanitizing shared by the feed and splits grammars.

use omni_core::AmericanOdds;
use once_cell::sync::Lazy;
use regex::Regex;

static SIGNED_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").expect("valid regex"));
static SIGNED_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+\.?\d*").expect("valid regex"));
static UNSIGNED_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d*").expect("valid regex"));
static ODDS_SCAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+-]?\d+").expect("valid regex"));

/// Sanitize an odds token.
///
/// Empty → `None`, "even" → 100, `+` stripped, then the first signed
/// integer in the token.
pub fn sanitize_odds(token: &str) -> Option<AmericanOdds> {
    let s = token.trim();
    if s.is_empty() {
        return None;
    }
    if s.eq_ignore_ascii_case("even") {
        return Some(100);
    }
    let s = s.replace('+', "");
    SIGNED_INT
        .find(&s)
        .and_then(|m| m.as_str().parse::<AmericanOdds>().ok())
}

/// First decimal number in a token (`-3.5`, `45.5`, `8`).
pub fn extract_point(token: &str) -> Option<f64> {
    SIGNED_DECIMAL
        .find(token)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Percentage token: `55%`, `55.5`, or anything containing a number.
pub fn parse_percentage(token: &str) -> Option<f64> {
    let t = token.trim().replace('%', "");
    if t.is_empty() {
        return None;
    }
    if let Ok(v) = t.parse::<f64>() {
        return Some(v);
    }
    UNSIGNED_DECIMAL
        .find(&t)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Every signed integer in a line, in order of appearance.
///
/// A match that does not fit in [`AmericanOdds`] stays in place as `None`.
pub fn scan_odds(line: &str) -> Vec<Option<AmericanOdds>> {
    ODDS_SCAN
        .find_iter(line)
        .map(|m| sanitize_odds(m.as_str()))
        .collect()
}
