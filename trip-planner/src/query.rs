//! Trip queries as written by users: a YAML file or a JSON request body.
//!
//! ```yaml
//! origin: SEA
//! destinations:
//!   LHR: { min_days: 2, max_days: 5 }
//! exclusions:
//!   LHR:
//!     - { start: 2024-01-01, end: 2024-01-02 }
//! ```
//!
//! Location codes are normalized on the way in, and dwell windows and
//! exclusion ranges are validated, so a query that parses is well-formed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{DwellWindow, ExclusionRange, LocationCode};
use crate::planner::TripRequest;

/// Errors from reading a query file.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("failed to read query {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse query: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A trip to plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TripQuery {
    pub origin: LocationCode,

    #[serde(default)]
    pub destinations: BTreeMap<LocationCode, DwellWindow>,

    #[serde(default)]
    pub exclusions: BTreeMap<LocationCode, Vec<ExclusionRange>>,
}

impl TripQuery {
    /// Parse a YAML query. JSON is valid YAML, so this reads both.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, QueryError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a query file.
    pub fn load(path: &Path) -> Result<Self, QueryError> {
        let contents = std::fs::read_to_string(path).map_err(|source| QueryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Convert into a planner request.
    pub fn into_request(self) -> TripRequest {
        let mut request = TripRequest::new(self.origin);
        request.destinations = self.destinations;
        for (location, ranges) in self.exclusions {
            for range in ranges {
                request.exclusions.add(location.clone(), range);
            }
        }
        request
    }
}
