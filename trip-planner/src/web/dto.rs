//! Request and response types for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::domain::{LegRecord, Price, Stop};
use crate::planner::SearchResult;

/// Query string for `GET /legs`.
#[derive(Debug, Default, Deserialize)]
pub struct LegsQuery {
    /// Only list legs departing here
    pub origin: Option<String>,
}

/// Response for `GET /legs`.
#[derive(Debug, Serialize)]
pub struct LegsResponse {
    pub count: usize,
    pub legs: Vec<LegRecord>,
}

/// Response for `POST /legs/reload`.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// Legs in the new snapshot
    pub legs: usize,
    /// Cached records that failed validation
    pub rejected: usize,
}

/// Response for `POST /trip/plan`.
#[derive(Debug, Serialize)]
pub struct PlanTripResponse {
    /// Whether any trip satisfies the query
    pub found: bool,
    /// Stops of the cheapest trip, in travel order
    pub stops: Vec<Stop>,
    /// Total fare; `null` when nothing was found
    pub total_cost: Option<Price>,
    pub nodes_expanded: usize,
    /// False if the search stopped on a budget, so a cheaper trip may exist
    pub complete: bool,
}

impl From<SearchResult> for PlanTripResponse {
    fn from(result: SearchResult) -> Self {
        let complete = result.is_complete();
        let nodes_expanded = result.nodes_expanded;

        match result.itinerary {
            Some(itinerary) => Self {
                found: true,
                total_cost: Some(itinerary.total_cost()),
                stops: itinerary.stops().to_vec(),
                nodes_expanded,
                complete,
            },
            None => Self {
                found: false,
                stops: Vec::new(),
                total_cost: None,
                nodes_expanded,
                complete,
            },
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
