//! Search configuration for the trip planner.

use std::time::Duration;

use serde::Deserialize;

use super::heuristic::HeuristicMode;

/// Configuration parameters for trip search.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of search nodes to expand.
    /// When reached, the best trip found so far is returned.
    pub max_expansions: usize,

    /// Wall-clock budget for one search (milliseconds).
    pub time_limit_ms: u64,

    /// Cost-to-go estimate used for pruning.
    pub heuristic: HeuristicMode,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_expansions: usize, time_limit_ms: u64, heuristic: HeuristicMode) -> Self {
        Self {
            max_expansions,
            time_limit_ms,
            heuristic,
        }
    }

    /// Returns the time limit as a Duration.
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: 1_000_000,
            time_limit_ms: 10_000, // 10 seconds
            heuristic: HeuristicMode::default(),
        }
    }
}
