//! Trip planner using best-first branch-and-bound search.
//!
//! This module answers: "what is the cheapest way to leave home, visit each
//! of these places once, staying the right number of days at each, and come
//! back, without travelling on dates I can't?"
//!
//! The search runs over an immutable [`LegStore`](crate::legs::LegStore)
//! snapshot and performs no I/O, so it can be exercised with synthetic legs.

mod config;
mod constraints;
mod heuristic;
mod search;

#[cfg(test)]
mod search_tests;

pub use config::SearchConfig;
pub use constraints::{ConstraintIndex, violates};
pub use heuristic::{Estimator, HeuristicMode};
pub use search::{Planner, SearchError, SearchResult, Termination, TripRequest};
