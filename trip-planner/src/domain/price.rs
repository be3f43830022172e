//! Price handling.
//!
//! Fares arrive as decimal amounts (`200.5`) but the planner sums and compares
//! them constantly, so they are stored as whole cents. This keeps costs totally
//! ordered and additions exact.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// Float noise below this many cents is not treated as rounding.
const SUB_CENT_TOLERANCE: f64 = 1e-6;

/// Error returned when an amount cannot be used as a price.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid price: {reason}")]
pub struct InvalidPrice {
    reason: &'static str,
}

impl InvalidPrice {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A non-negative price in cents.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::Price;
///
/// let fare = Price::from_amount(200.5).unwrap();
/// assert_eq!(fare.cents(), 20050);
/// assert_eq!(fare.to_string(), "200.50");
///
/// assert!(Price::from_amount(-1.0).is_err());
/// assert!(Price::from_amount(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    /// Zero cost.
    pub const ZERO: Price = Price(0);

    /// Create a price from whole cents.
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Create a price from a decimal amount, rounding to the nearest cent.
    pub fn from_amount(amount: f64) -> Result<Self, InvalidPrice> {
        if !amount.is_finite() {
            return Err(InvalidPrice::new("must be a finite number"));
        }
        if amount < 0.0 {
            return Err(InvalidPrice::new("must not be negative"));
        }

        let exact = amount * 100.0;
        let cents = exact.round();
        if cents >= u64::MAX as f64 {
            return Err(InvalidPrice::new("too large"));
        }
        if (exact - cents).abs() > SUB_CENT_TOLERANCE {
            debug!(amount, cents, "Rounded sub-cent price");
        }

        Ok(Self(cents as u64))
    }

    /// Returns the price in cents.
    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the price as a decimal amount.
    pub fn amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.amount())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_amount(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_amount_rounds_to_cents() {
        assert_eq!(Price::from_amount(10.0).unwrap().cents(), 1000);
        assert_eq!(Price::from_amount(0.016).unwrap().cents(), 2);
        assert_eq!(Price::from_amount(99.999).unwrap().cents(), 10000);
        assert_eq!(Price::from_amount(0.0).unwrap(), Price::ZERO);
    }

    #[test]
    fn sub_cent_rounding_is_logged() {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(Price::from_amount(19.99).unwrap().cents(), 1999);
            assert_eq!(Price::from_amount(0.29).unwrap().cents(), 29);
        });
        assert!(captured.0.lock().unwrap().is_empty());

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(Price::from_amount(0.016).unwrap().cents(), 2);
        });
        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Rounded sub-cent price"));
    }

    #[test]
    fn rejects_invalid_amounts() {
        assert!(Price::from_amount(-0.01).is_err());
        assert!(Price::from_amount(f64::INFINITY).is_err());
        assert!(Price::from_amount(f64::NAN).is_err());
        assert!(Price::from_amount(1e30).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
        assert_eq!(Price::from_cents(123_456).to_string(), "1234.56");
        assert_eq!(Price::ZERO.to_string(), "0.00");
    }

    #[test]
    fn addition_and_sum() {
        let total: Price = [1000, 250, 5].into_iter().map(Price::from_cents).sum();
        assert_eq!(total, Price::from_cents(1255));
        assert_eq!(
            Price::from_cents(u64::MAX) + Price::from_cents(1),
            Price::from_cents(u64::MAX)
        );
    }

    #[test]
    fn serde_as_number() {
        let price = Price::from_cents(20050);
        assert_eq!(serde_json::to_string(&price).unwrap(), "200.5");

        let parsed: Price = serde_json::from_str("200.5").unwrap();
        assert_eq!(parsed, price);

        let parsed: Price = serde_json::from_str("10").unwrap();
        assert_eq!(parsed.cents(), 1000);

        assert!(serde_json::from_str::<Price>("-3").is_err());
        assert!(serde_json::from_str::<Price>("\"10\"").is_err());
    }
}
