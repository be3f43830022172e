//! Cost-to-go estimates.
//!
//! The planner prunes a partial trip when its cost plus the estimate for the
//! rest of the trip cannot beat the best complete trip found so far. Which
//! estimate to use is a speed/optimality trade-off:
//!
//! - [`HeuristicMode::CheapestHop`] looks only at the cheapest single next hop.
//!   It prunes hard and is fast, but it is not a lower bound once two or more
//!   destinations remain, and it treats locations without a direct hop as dead
//!   ends. Searches using it may return a trip that is not the cheapest.
//! - [`HeuristicMode::Zero`] never over-estimates, so pruning is exact and the
//!   cheapest trip is always found, at the price of exploring more nodes.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::domain::{LocationCode, Price};
use crate::legs::LegStore;

/// Which estimate the planner uses for pruning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicMode {
    /// Cheapest single hop toward a remaining destination (or home). Best effort.
    #[default]
    CheapestHop,
    /// Constant zero. Admissible.
    Zero,
}

/// Estimates the remaining cost of a trip from a given location.
#[derive(Debug, Clone, Copy)]
pub struct Estimator<'a> {
    legs: &'a LegStore,
    mode: HeuristicMode,
}

impl<'a> Estimator<'a> {
    pub fn new(legs: &'a LegStore, mode: HeuristicMode) -> Self {
        Self { legs, mode }
    }

    /// Estimate the cost to finish the trip from `current`.
    ///
    /// `None` means the trip cannot be finished from here under this estimate.
    pub fn estimate(
        &self,
        origin: &LocationCode,
        current: &LocationCode,
        remaining: &BTreeSet<LocationCode>,
    ) -> Option<Price> {
        match self.mode {
            HeuristicMode::Zero => Some(Price::ZERO),
            HeuristicMode::CheapestHop => self.cheapest_hop(origin, current, remaining),
        }
    }

    fn cheapest_hop(
        &self,
        origin: &LocationCode,
        current: &LocationCode,
        remaining: &BTreeSet<LocationCode>,
    ) -> Option<Price> {
        let legs = self.legs.legs_from(current);

        if remaining.is_empty() {
            if current == origin {
                return Some(Price::ZERO);
            }
            return legs
                .iter()
                .filter(|leg| &leg.destination == origin)
                .map(|leg| leg.price)
                .min();
        }

        legs.iter()
            .filter(|leg| remaining.contains(&leg.destination))
            .map(|leg| leg.price)
            .min()
    }
}
