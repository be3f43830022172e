//! Trip constraints: dwell windows and exclusion ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Allowed stay at a required destination, in whole days.
///
/// The stay is measured from the arrival date to the date of the next
/// departure. Both bounds are inclusive.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::DwellWindow;
///
/// let window = DwellWindow::new(2, 5).unwrap();
/// assert!(window.contains(2));
/// assert!(window.contains(5));
/// assert!(!window.contains(6));
///
/// assert!(DwellWindow::new(5, 2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDwellWindow")]
pub struct DwellWindow {
    min_days: u32,
    max_days: u32,
}

impl DwellWindow {
    /// Create a window, rejecting `min_days > max_days`.
    pub fn new(min_days: u32, max_days: u32) -> Result<Self, DomainError> {
        if min_days > max_days {
            return Err(DomainError::InvalidDwellWindow { min_days, max_days });
        }
        Ok(Self { min_days, max_days })
    }

    pub fn min_days(&self) -> u32 {
        self.min_days
    }

    pub fn max_days(&self) -> u32 {
        self.max_days
    }

    /// Whether a stay of `days` satisfies the window.
    pub fn contains(&self, days: i64) -> bool {
        i64::from(self.min_days) <= days && days <= i64::from(self.max_days)
    }
}

#[derive(Deserialize)]
struct RawDwellWindow {
    min_days: u32,
    max_days: u32,
}

impl TryFrom<RawDwellWindow> for DwellWindow {
    type Error = DomainError;

    fn try_from(raw: RawDwellWindow) -> Result<Self, Self::Error> {
        DwellWindow::new(raw.min_days, raw.max_days)
    }
}

/// Inclusive range of dates during which a location cannot be travelled to or from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawExclusionRange")]
pub struct ExclusionRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl ExclusionRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidExclusionRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Deserialize)]
struct RawExclusionRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawExclusionRange> for ExclusionRange {
    type Error = DomainError;

    fn try_from(raw: RawExclusionRange) -> Result<Self, Self::Error> {
        ExclusionRange::new(raw.start, raw.end)
    }
}
