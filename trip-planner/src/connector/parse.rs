//! Parsing of hand-entered fare details.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Price;

use super::error::ConnectorError;

/// Minimum Jaro-Winkler similarity for an airline suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

static PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid regex"));

static HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:hours?|h)\b").expect("valid regex"));

static MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:minutes?|mins?|m)\b").expect("valid regex")
});

/// Parse the first decimal number in `input` as a price.
///
/// Currency symbols and other decoration are ignored: `"$200.50"` is 200.50.
pub fn parse_price(input: &str) -> Result<Price, ConnectorError> {
    let invalid = || ConnectorError::InvalidPrice(input.to_string());

    let number = PRICE.find(input).ok_or_else(invalid)?;
    let amount: f64 = number.as_str().parse().map_err(|_| invalid())?;
    Price::from_amount(amount).map_err(|_| invalid())
}

/// Normalize a duration to `H:MM`.
///
/// Accepts `"2:30"`, `"2h 45m"`, `"1 hour 15 minutes"` and the like. Minutes
/// past 59 carry into hours; whole days wrap away.
pub fn parse_duration(input: &str) -> Result<String, ConnectorError> {
    let input = input.trim();
    let invalid = || ConnectorError::InvalidDuration(input.to_string());
    let number = |s: &str| s.parse::<u64>().map_err(|_| invalid());

    let (hours, minutes) = if let Some(caps) = CLOCK.captures(input) {
        (number(&caps[1])?, number(&caps[2])?)
    } else {
        let hours = HOURS.captures(input).map(|c| number(&c[1])).transpose()?;
        let minutes = MINUTES.captures(input).map(|c| number(&c[1])).transpose()?;
        if hours.is_none() && minutes.is_none() {
            return Err(invalid());
        }
        (hours.unwrap_or(0), minutes.unwrap_or(0))
    };

    let total = hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .ok_or_else(invalid)?
        % (24 * 60);
    Ok(format!("{}:{:02}", total / 60, total % 60))
}

/// Known airlines: full name to two-character code.
#[derive(Debug, Clone, Default)]
pub struct AirlineDirectory {
    airlines: BTreeMap<String, String>,
}

impl AirlineDirectory {
    pub fn new(airlines: BTreeMap<String, String>) -> Self {
        Self { airlines }
    }

    /// Resolve a code (`"as"`) or name (`"alaska"`) to the canonical name.
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let input = input.trim();

        self.airlines
            .iter()
            .find(|(_, code)| code.eq_ignore_ascii_case(input))
            .or_else(|| {
                self.airlines
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(input))
            })
            .map(|(name, _)| name.as_str())
    }

    /// Closest airline name to `input`, if any is similar enough.
    pub fn suggest(&self, input: &str) -> Option<&str> {
        let input = input.trim().to_lowercase();

        self.airlines
            .keys()
            .map(|name| (name, strsim::jaro_winkler(&input, &name.to_lowercase())))
            .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.airlines.is_empty()
    }
}
