//! Cache-first fare lookup.
//!
//! Wraps a [`FareConnector`] and the [`LegCache`]: fresh cached fares are
//! served from disk, everything else is asked of the connector and written
//! back, so the next planning run sees it.

use tracing::{debug, info};

use crate::cache::{CacheError, CacheKey, LegCache};
use crate::connector::{ConnectorError, FareConnector, FareQuery};
use crate::domain::{DomainError, Leg};

/// Duration and airline label for fares recorded without details.
const UNKNOWN: &str = "unknown";

/// Errors from a fare lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A cached record no longer validates
    #[error("invalid cached leg: {0}")]
    Domain(#[from] DomainError),
}

/// Fare lookup backed by a connector and the leg cache.
pub struct FareLookup<C> {
    connector: C,
    cache: LegCache,
}

impl<C: FareConnector> FareLookup<C> {
    pub fn new(connector: C, cache: LegCache) -> Self {
        Self { connector, cache }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn key(&self, query: &FareQuery) -> CacheKey {
        CacheKey {
            connector: self.connector.name().to_string(),
            origin: query.origin.clone(),
            destination: query.destination.clone(),
            date: query.date,
            payment: query.payment,
        }
    }

    /// Look up one fare.
    ///
    /// A cached entry younger than the TTL is returned as-is unless
    /// `force_refresh` is set; otherwise the connector is asked and the
    /// answer cached.
    pub async fn lookup(&self, query: &FareQuery, force_refresh: bool) -> Result<Leg, LookupError> {
        let key = self.key(query);

        if !force_refresh && let Some(record) = self.cache.get(&key) {
            debug!(key = %key, "Fare cache hit");
            return Ok(record.into_leg()?);
        }

        let quote = self.connector.get_details(query).await?;
        let leg = Leg::new(
            query.origin.clone(),
            query.destination.clone(),
            query.date,
            quote.price,
            quote.duration,
            quote.airline,
        );

        self.cache.set(&key, &leg.to_record())?;
        info!(key = %key, price = %leg.price, "Recorded fare");
        Ok(leg)
    }

    /// Record a calendar of fares on consecutive days starting at `start`.
    ///
    /// Stops when the connector has no more prices or after `max_days`
    /// days. Duration and airline are not known in this mode.
    pub async fn record_calendar(
        &self,
        start: &FareQuery,
        max_days: u32,
    ) -> Result<Vec<Leg>, LookupError> {
        let mut recorded = Vec::new();
        let mut query = Some(start.clone());

        for _ in 0..max_days {
            let Some(current) = query else {
                break;
            };
            let Some(price) = self.connector.get_price(&current).await? else {
                break;
            };

            let leg = Leg::new(
                current.origin.clone(),
                current.destination.clone(),
                current.date,
                price,
                UNKNOWN,
                UNKNOWN,
            );
            self.cache.set(&self.key(&current), &leg.to_record())?;
            recorded.push(leg);

            query = current.next_day();
        }

        info!(
            origin = %start.origin,
            destination = %start.destination,
            days = recorded.len(),
            "Recorded fare calendar"
        );
        Ok(recorded)
    }
}
