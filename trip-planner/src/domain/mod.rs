//! Domain types for the trip planner.
//!
//! This module contains the core domain model: locations, prices, legs,
//! trip constraints and itineraries. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod constraint;
mod date;
mod error;
mod itinerary;
mod leg;
mod location;
mod price;

pub use constraint::{DwellWindow, ExclusionRange};
pub use date::{DATE_FORMAT, InvalidDate, days_between, format_date, parse_date};
pub use error::DomainError;
pub use itinerary::{Itinerary, Stop};
pub use leg::{Leg, LegRecord};
pub use location::{InvalidLocation, LocationCode};
pub use price::{InvalidPrice, Price};
