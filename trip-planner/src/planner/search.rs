//! Best-first branch-and-bound trip search.
//!
//! Finds the cheapest round trip from an origin that visits every required
//! destination exactly once, respecting dwell windows and date exclusions.
//! Partial trips are expanded cheapest-estimate-first; any partial trip that
//! cannot beat the best complete trip found so far is discarded.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::domain::{
    DwellWindow, ExclusionRange, Itinerary, Leg, LocationCode, Price, Stop, days_between,
};
use crate::legs::LegStore;

use super::config::SearchConfig;
use super::constraints::ConstraintIndex;
use super::heuristic::Estimator;

/// The wall clock is read once every `CLOCK_CHECK_MASK + 1` expansions.
const CLOCK_CHECK_MASK: usize = 0x3FF;

/// Error from trip search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

/// Request for trip search.
#[derive(Debug, Clone)]
pub struct TripRequest {
    /// Where the trip starts and must end.
    pub origin: LocationCode,

    /// Locations to visit exactly once, with the allowed stay at each.
    pub destinations: BTreeMap<LocationCode, DwellWindow>,

    /// Dates on which locations cannot be travelled to or from.
    pub exclusions: ConstraintIndex,
}

impl TripRequest {
    /// Create a request with no destinations and no exclusions.
    pub fn new(origin: LocationCode) -> Self {
        Self {
            origin,
            destinations: BTreeMap::new(),
            exclusions: ConstraintIndex::new(),
        }
    }

    /// Add a required destination.
    pub fn with_destination(mut self, location: LocationCode, window: DwellWindow) -> Self {
        self.destinations.insert(location, window);
        self
    }

    /// Add an exclusion range.
    pub fn with_exclusion(mut self, location: LocationCode, range: ExclusionRange) -> Self {
        self.exclusions.add(location, range);
        self
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.destinations.contains_key(&self.origin) {
            return Err(SearchError::InvalidRequest(format!(
                "origin {} cannot also be a required destination",
                self.origin
            )));
        }

        Ok(())
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every candidate was explored or pruned; the result is final.
    Exhausted,
    /// `max_expansions` was reached.
    ExpansionLimit,
    /// The time limit was reached.
    TimeLimit,
}

/// Result of trip search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Cheapest trip found, or `None` if no trip satisfies the constraints.
    pub itinerary: Option<Itinerary>,

    /// Number of search nodes expanded.
    pub nodes_expanded: usize,

    /// Why the search stopped.
    pub termination: Termination,
}

impl SearchResult {
    /// Returns true if the search ran to completion rather than hitting a budget.
    pub fn is_complete(&self) -> bool {
        self.termination == Termination::Exhausted
    }
}

/// A partial trip. Never mutated once created; children copy what they extend.
#[derive(Debug, Clone)]
struct SearchNode {
    location: LocationCode,
    cost: Price,
    path: Vec<Stop>,
    last_arrival: Option<NaiveDate>,
    remaining: BTreeSet<LocationCode>,
}

impl SearchNode {
    fn root(request: &TripRequest) -> Self {
        Self {
            location: request.origin.clone(),
            cost: Price::ZERO,
            path: Vec::new(),
            last_arrival: None,
            remaining: request.destinations.keys().cloned().collect(),
        }
    }

    /// Back home with nothing left to visit.
    fn is_solution(&self, origin: &LocationCode) -> bool {
        self.remaining.is_empty() && &self.location == origin
    }
}

/// Queue entry: lowest priority first, ties broken by the lexically smaller path.
struct Queued {
    priority: Price,
    node: SearchNode,
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.node.path.cmp(&self.node.path))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

/// Expansion and wall-clock budget for one search.
struct Budget {
    max_expansions: usize,
    time_limit: Duration,
    started: Instant,
}

impl Budget {
    fn start(config: &SearchConfig) -> Self {
        Self {
            max_expansions: config.max_expansions,
            time_limit: config.time_limit(),
            started: Instant::now(),
        }
    }

    fn exceeded(&self, expanded: usize) -> Option<Termination> {
        if expanded >= self.max_expansions {
            return Some(Termination::ExpansionLimit);
        }
        if expanded & CLOCK_CHECK_MASK == 0 && self.started.elapsed() >= self.time_limit {
            return Some(Termination::TimeLimit);
        }
        None
    }
}

/// Trip planner over a leg store snapshot.
pub struct Planner<'a> {
    legs: &'a LegStore,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(legs: &'a LegStore, config: &'a SearchConfig) -> Self {
        Self { legs, config }
    }

    /// Search for the cheapest round trip satisfying `request`.
    pub fn search(&self, request: &TripRequest) -> Result<SearchResult, SearchError> {
        request.validate()?;

        debug!(
            origin = %request.origin,
            destinations = request.destinations.len(),
            legs = self.legs.len(),
            heuristic = ?self.config.heuristic,
            "Starting trip search"
        );

        if request.destinations.is_empty() {
            return Ok(SearchResult {
                itinerary: Some(Itinerary::empty()),
                nodes_expanded: 0,
                termination: Termination::Exhausted,
            });
        }

        let estimator = Estimator::new(self.legs, self.config.heuristic);
        let budget = Budget::start(self.config);

        let mut open = BinaryHeap::new();
        open.push(Queued {
            priority: Price::ZERO,
            node: SearchNode::root(request),
        });

        let mut best: Option<Itinerary> = None;
        let mut nodes_expanded = 0;
        let mut termination = Termination::Exhausted;

        while let Some(Queued { node, .. }) = open.pop() {
            let bound = best.as_ref().map(Itinerary::total_cost);

            // The bound may have tightened since this node was queued.
            if bound.is_some_and(|b| node.cost >= b) {
                continue;
            }

            if node.is_solution(&request.origin) {
                trace!(cost = %node.cost, legs = node.path.len(), "Found cheaper trip");
                best = Some(Itinerary::new(node.path));
                continue;
            }

            if let Some(reason) = budget.exceeded(nodes_expanded) {
                termination = reason;
                break;
            }
            nodes_expanded += 1;

            self.expand(&node, request, &estimator, bound, &mut open);
        }

        debug!(
            nodes_expanded,
            found = best.is_some(),
            cost = ?best.as_ref().map(|b| b.total_cost().to_string()),
            termination = ?termination,
            "Trip search complete"
        );

        Ok(SearchResult {
            itinerary: best,
            nodes_expanded,
            termination,
        })
    }

    /// Push every admissible extension of `node` by one leg.
    fn expand(
        &self,
        node: &SearchNode,
        request: &TripRequest,
        estimator: &Estimator<'_>,
        bound: Option<Price>,
        open: &mut BinaryHeap<Queued>,
    ) {
        for leg in self.legs.legs_from(&node.location) {
            if !admits(node, leg, request) {
                continue;
            }

            let cost = node.cost + leg.price;
            let mut remaining = node.remaining.clone();
            remaining.remove(&leg.destination);

            let Some(estimate) = estimator.estimate(&request.origin, &leg.destination, &remaining)
            else {
                continue;
            };
            let priority = cost + estimate;
            if bound.is_some_and(|b| priority >= b) {
                continue;
            }

            let mut path = node.path.clone();
            path.push(Stop::new(leg.destination.clone(), leg.date, leg.price));

            open.push(Queued {
                priority,
                node: SearchNode {
                    location: leg.destination.clone(),
                    cost,
                    path,
                    last_arrival: Some(leg.date),
                    remaining,
                },
            });
        }
    }
}

/// Whether `leg` may extend the partial trip `node`.
///
/// Checks, in order: required destinations are visited at most once, legs
/// never depart before the previous arrival, the stay at a required
/// destination fits its dwell window, and neither end of the leg is excluded
/// on the leg's date.
///
/// The date order holds everywhere, including when leaving the origin or a
/// place passed through without a dwell window; only the window itself is
/// limited to required destinations.
fn admits(node: &SearchNode, leg: &Leg, request: &TripRequest) -> bool {
    if request.destinations.contains_key(&leg.destination)
        && !node.remaining.contains(&leg.destination)
    {
        return false;
    }

    if let Some(arrived) = node.last_arrival {
        let stay = days_between(arrived, leg.date);
        if stay < 0 {
            return false;
        }
        if let Some(window) = request.destinations.get(&node.location)
            && !window.contains(stay)
        {
            return false;
        }
    }

    !request.exclusions.rejects(leg)
}
