//! Travel legs.
//!
//! A `Leg` is one dated, priced hop from one location to another. `LegRecord`
//! is its loosely-typed persisted form; converting a record into a leg is where
//! malformed dates and prices are rejected.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::{format_date, parse_date};
use super::{DomainError, LocationCode, Price};

/// A single dated, priced travel segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    /// Departure location
    pub origin: LocationCode,
    /// Arrival location
    pub destination: LocationCode,
    /// Travel date
    pub date: NaiveDate,
    /// Fare for this leg
    pub price: Price,
    /// Free-form duration label, e.g. "2:30"
    pub duration: String,
    /// Carrier name
    pub airline: String,
}

impl Leg {
    /// Creates a new leg.
    pub fn new(
        origin: LocationCode,
        destination: LocationCode,
        date: NaiveDate,
        price: Price,
        duration: impl Into<String>,
        airline: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            destination,
            date,
            price,
            duration: duration.into(),
            airline: airline.into(),
        }
    }

    /// Converts the leg into its persisted form.
    pub fn to_record(&self) -> LegRecord {
        LegRecord {
            origin: self.origin.to_string(),
            destination: self.destination.to_string(),
            date: format_date(self.date),
            price: self.price.amount(),
            duration: self.duration.clone(),
            airline: self.airline.clone(),
        }
    }
}

/// A leg as stored in the cache: plain strings and a float price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegRecord {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub price: f64,
    pub duration: String,
    pub airline: String,
}

impl LegRecord {
    /// Validate the record into a `Leg`.
    ///
    /// Location codes are normalized (trimmed, upper-cased) before validation.
    pub fn into_leg(self) -> Result<Leg, DomainError> {
        let origin = LocationCode::parse_normalized(&self.origin)?;
        let destination = LocationCode::parse_normalized(&self.destination)?;
        let date = parse_date(&self.date)?;
        let price = Price::from_amount(self.price)?;

        Ok(Leg {
            origin,
            destination,
            date,
            price,
            duration: self.duration,
            airline: self.airline,
        })
    }
}
