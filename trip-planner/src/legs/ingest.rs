//! Ingestion: turning persisted leg records into a leg store snapshot.
//!
//! Validation happens here and only here. Records with malformed dates,
//! unusable prices or bad location codes are set aside, so the search never
//! sees invalid data.

use tracing::{debug, warn};

use crate::cache::{CacheError, LegCache};
use crate::domain::{DomainError, LegRecord};

use super::LegStore;

/// A record that failed validation, with the reason.
#[derive(Debug, Clone)]
pub struct RejectedRecord {
    pub record: LegRecord,
    pub error: DomainError,
}

/// Outcome of an ingestion pass.
#[derive(Debug, Default)]
pub struct Ingestion {
    /// Legs that passed validation.
    pub store: LegStore,
    /// Records that did not.
    pub rejected: Vec<RejectedRecord>,
}

/// Validate `records` and collect the good ones into a fresh store.
pub fn ingest(records: impl IntoIterator<Item = LegRecord>) -> Ingestion {
    let mut ingestion = Ingestion::default();

    for record in records {
        match record.clone().into_leg() {
            Ok(leg) => ingestion.store.add_leg(leg),
            Err(error) => {
                warn!(
                    origin = %record.origin,
                    destination = %record.destination,
                    date = %record.date,
                    error = %error,
                    "Rejected leg record"
                );
                ingestion.rejected.push(RejectedRecord { record, error });
            }
        }
    }

    debug!(
        legs = ingestion.store.len(),
        rejected = ingestion.rejected.len(),
        "Ingestion complete"
    );

    ingestion
}

/// Build a fresh snapshot from every record in the cache, whatever its age.
pub fn load_from_cache(cache: &LegCache) -> Result<Ingestion, CacheError> {
    Ok(ingest(cache.load_all()?))
}
