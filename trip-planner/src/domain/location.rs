//! Location code types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest accepted location code.
const MAX_LEN: usize = 8;

/// Error returned when parsing an invalid location code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location code {input:?}: {reason}")]
pub struct InvalidLocation {
    input: String,
    reason: &'static str,
}

/// A validated location code, such as an IATA airport code.
///
/// Codes are 1 to 8 uppercase ASCII letters or digits. Any `LocationCode`
/// value is valid by construction.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::LocationCode;
///
/// let sea = LocationCode::parse("SEA").unwrap();
/// assert_eq!(sea.as_str(), "SEA");
///
/// // Lowercase is rejected by `parse`, but accepted by `parse_normalized`
/// assert!(LocationCode::parse("sea").is_err());
/// assert_eq!(LocationCode::parse_normalized(" sea ").unwrap(), sea);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationCode(String);

impl LocationCode {
    /// Parse a location code, rejecting anything that is not already canonical.
    pub fn parse(s: &str) -> Result<Self, InvalidLocation> {
        let fail = |reason| InvalidLocation {
            input: s.to_string(),
            reason,
        };

        if s.is_empty() {
            return Err(fail("must not be empty"));
        }
        if s.len() > MAX_LEN {
            return Err(fail("must be at most 8 characters"));
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(fail("must be uppercase ASCII letters or digits"));
        }

        Ok(Self(s.to_string()))
    }

    /// Parse user input: surrounding whitespace is trimmed and letters are upper-cased.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidLocation> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocationCode {
    type Error = InvalidLocation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_normalized(&value)
    }
}

impl From<LocationCode> for String {
    fn from(code: LocationCode) -> Self {
        code.0
    }
}

impl fmt::Debug for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationCode({})", self.0)
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
