//! Itinerary types.
//!
//! An `Itinerary` is the answer to a trip search: the ordered stops of a
//! closed round trip together with what it costs.

use chrono::NaiveDate;
use serde::Serialize;

use super::{LocationCode, Price};

/// One step of an itinerary: the leg that arrives at `location` on `date`.
///
/// Stops order lexically by location, then date, then price. The planner
/// relies on this order to break ties between equally cheap partial trips.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Stop {
    /// Location arrived at
    pub location: LocationCode,
    /// Date of the leg that arrives here
    pub date: NaiveDate,
    /// Fare of the leg that arrives here
    pub price: Price,
}

impl Stop {
    pub fn new(location: LocationCode, date: NaiveDate, price: Price) -> Self {
        Self {
            location,
            date,
            price,
        }
    }
}

/// A closed round trip.
///
/// # Invariants
///
/// - `total_cost` is the sum of the stop prices
/// - When non-empty, the last stop is back at the trip origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    stops: Vec<Stop>,
    total_cost: Price,
}

impl Itinerary {
    /// Build an itinerary, totalling the stop prices.
    pub fn new(stops: Vec<Stop>) -> Self {
        let total_cost = stops.iter().map(|s| s.price).sum();
        Self { stops, total_cost }
    }

    /// The zero-leg trip: nothing to visit, nothing to pay.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn total_cost(&self) -> Price {
        self.total_cost
    }

    /// Number of legs travelled.
    pub fn leg_count(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Date the trip leaves the origin, if it goes anywhere.
    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.stops.first().map(|s| s.date)
    }

    /// Date the trip arrives back at the origin, if it goes anywhere.
    pub fn return_date(&self) -> Option<NaiveDate> {
        self.stops.last().map(|s| s.date)
    }
}
