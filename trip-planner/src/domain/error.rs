//! Domain error types.
//!
//! These errors represent validation failures on input data: leg records,
//! trip constraints and user-typed values. They are raised before any search
//! starts, never from inside the search loop.

use chrono::NaiveDate;

use super::date::InvalidDate;
use super::location::InvalidLocation;
use super::price::InvalidPrice;

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Location code failed validation
    #[error(transparent)]
    InvalidLocation(#[from] InvalidLocation),

    /// Date string was not ISO `YYYY-MM-DD`
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),

    /// Price was negative or not a finite number
    #[error(transparent)]
    InvalidPrice(#[from] InvalidPrice),

    /// Dwell window with min greater than max
    #[error("invalid dwell window: min {min_days} days exceeds max {max_days} days")]
    InvalidDwellWindow { min_days: u32, max_days: u32 },

    /// Exclusion range that ends before it starts
    #[error("invalid exclusion range: {start} is after {end}")]
    InvalidExclusionRange { start: NaiveDate, end: NaiveDate },
}
