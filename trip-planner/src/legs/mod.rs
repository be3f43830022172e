//! The leg store: every known leg, keyed by where it departs from.
//!
//! Several legs may join the same pair of locations on different dates (or on
//! the same date at different fares), so this is a multigraph rather than a
//! simple adjacency map. The store is append-only; a search receives an
//! immutable snapshot of it.

mod ingest;

use std::collections::HashMap;

use crate::domain::{Leg, LocationCode};

pub use ingest::{Ingestion, RejectedRecord, ingest, load_from_cache};

/// Outbound legs grouped by origin.
#[derive(Debug, Clone, Default)]
pub struct LegStore {
    outbound: HashMap<LocationCode, Vec<Leg>>,
    len: usize,
}

impl LegStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a leg. No deduplication is performed.
    pub fn add_leg(&mut self, leg: Leg) {
        self.outbound.entry(leg.origin.clone()).or_default().push(leg);
        self.len += 1;
    }

    /// All legs departing `location`, in insertion order.
    ///
    /// Unknown locations have no legs; this never fails.
    pub fn legs_from(&self, location: &LocationCode) -> &[Leg] {
        self.outbound
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Locations with at least one outbound leg.
    pub fn origins(&self) -> impl Iterator<Item = &LocationCode> {
        self.outbound.keys()
    }

    /// Every leg in the store, grouped by origin.
    pub fn iter(&self) -> impl Iterator<Item = &Leg> {
        self.outbound.values().flatten()
    }

    /// Total number of legs.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the store holds no legs.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Extend<Leg> for LegStore {
    fn extend<I: IntoIterator<Item = Leg>>(&mut self, iter: I) {
        for leg in iter {
            self.add_leg(leg);
        }
    }
}

impl FromIterator<Leg> for LegStore {
    fn from_iter<I: IntoIterator<Item = Leg>>(iter: I) -> Self {
        let mut store = LegStore::new();
        store.extend(iter);
        store
    }
}
