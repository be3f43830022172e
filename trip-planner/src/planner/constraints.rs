//! Date exclusions per location.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{ExclusionRange, Leg, LocationCode};

/// Whether `date` falls inside any of `ranges`.
pub fn violates(date: NaiveDate, ranges: &[ExclusionRange]) -> bool {
    ranges.iter().any(|range| range.contains(date))
}

/// Exclusion ranges keyed by location.
///
/// A location with an exclusion cannot be departed from or arrived at on any
/// date inside the range.
#[derive(Debug, Clone, Default)]
pub struct ConstraintIndex {
    exclusions: HashMap<LocationCode, Vec<ExclusionRange>>,
}

impl ConstraintIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exclusion range for a location.
    pub fn add(&mut self, location: LocationCode, range: ExclusionRange) {
        self.exclusions.entry(location).or_default().push(range);
    }

    /// Exclusion ranges registered for `location`; empty if there are none.
    pub fn ranges_for(&self, location: &LocationCode) -> &[ExclusionRange] {
        self.exclusions
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `location` is closed on `date`.
    pub fn excludes(&self, location: &LocationCode, date: NaiveDate) -> bool {
        violates(date, self.ranges_for(location))
    }

    /// Whether a leg's date is excluded at either of its ends.
    pub fn rejects(&self, leg: &Leg) -> bool {
        self.excludes(&leg.origin, leg.date) || self.excludes(&leg.destination, leg.date)
    }

    /// Returns true if no exclusions are registered.
    pub fn is_empty(&self) -> bool {
        self.exclusions.is_empty()
    }
}
