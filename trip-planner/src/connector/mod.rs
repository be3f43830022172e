//! Fare connectors: where leg prices come from.
//!
//! A connector answers "what does a flight from here to there on this date
//! cost?". Connectors are only used when filling the leg cache; the planner
//! never talks to one.
//!
//! Two connectors are provided:
//! - [`ManualConnector`] prompts a person at a terminal
//! - [`HttpFareConnector`] asks a JSON fare API

mod error;
mod http;
mod manual;
mod parse;

use std::fmt;
use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{LocationCode, Price};

pub use error::ConnectorError;
pub use http::{FareApiConfig, HttpFareConnector};
pub use manual::ManualConnector;
pub use parse::{AirlineDirectory, parse_duration, parse_price};

/// How a fare is paid for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    Money,
    Points,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Money => "money",
            PaymentType::Points => "points",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single fare to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareQuery {
    pub origin: LocationCode,
    pub destination: LocationCode,
    pub date: NaiveDate,
    pub payment: PaymentType,
}

impl FareQuery {
    /// Create a query paid in money.
    pub fn new(origin: LocationCode, destination: LocationCode, date: NaiveDate) -> Self {
        Self {
            origin,
            destination,
            date,
            payment: PaymentType::Money,
        }
    }

    /// The same route one day later.
    pub fn next_day(&self) -> Option<Self> {
        Some(Self {
            date: self.date.succ_opt()?,
            ..self.clone()
        })
    }
}

/// What a connector reports for one fare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareQuote {
    pub price: Price,
    /// Normalized `H:MM`, or `unknown`
    pub duration: String,
    pub airline: String,
}

/// Trait for fare sources.
///
/// This abstraction allows the lookup layer to be tested with mock fares.
pub trait FareConnector {
    /// Short name used in cache keys.
    fn name(&self) -> &str;

    /// Full details for one fare.
    fn get_details(
        &self,
        query: &FareQuery,
    ) -> impl Future<Output = Result<FareQuote, ConnectorError>> + Send;

    /// Price alone, for walking a calendar of fares.
    ///
    /// `Ok(None)` means there are no more prices to record.
    fn get_price(
        &self,
        query: &FareQuery,
    ) -> impl Future<Output = Result<Option<Price>, ConnectorError>> + Send;
}
