//! Plan the cheapest trip for a query file against the cached fares.
//!
//! Usage: `plan-trip <query.yaml>`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{error, warn};

use trip_planner::cache::LegCache;
use trip_planner::config::AppConfig;
use trip_planner::domain::Itinerary;
use trip_planner::legs::load_from_cache;
use trip_planner::logging;
use trip_planner::planner::{Planner, SearchResult};
use trip_planner::query::TripQuery;

fn main() -> ExitCode {
    logging::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: plan-trip <query.yaml>");
        return ExitCode::FAILURE;
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let query = TripQuery::load(path)?;

    let cache = LegCache::new(config.cache_config());
    let ingestion = load_from_cache(&cache)?;
    if !ingestion.rejected.is_empty() {
        warn!(
            rejected = ingestion.rejected.len(),
            "Some cached legs were invalid and skipped"
        );
    }

    let request = query.into_request();
    let result = Planner::new(&ingestion.store, &config.search).search(&request)?;

    print!("{}", render(&request.origin.to_string(), &result));
    Ok(())
}

fn render(origin: &str, result: &SearchResult) -> String {
    let mut out = String::new();

    match &result.itinerary {
        Some(itinerary) if itinerary.is_empty() => {
            out.push_str("Nothing to visit: the cheapest trip is staying home.\n");
        }
        Some(itinerary) => out.push_str(&render_itinerary(origin, itinerary)),
        None => out.push_str("No trip satisfies the query.\n"),
    }

    if !result.is_complete() {
        out.push_str(&format!(
            "Search stopped early ({:?}) after {} nodes; a cheaper trip may exist.\n",
            result.termination, result.nodes_expanded
        ));
    }

    out
}

fn render_itinerary(origin: &str, itinerary: &Itinerary) -> String {
    let mut out = format!("Cheapest trip: {}\n", itinerary.total_cost());
    let mut from = origin.to_string();

    for stop in itinerary.stops() {
        out.push_str(&format!(
            "  {}  {:>8} -> {:<8} {:>10}\n",
            stop.date,
            from,
            stop.location.as_str(),
            stop.price.to_string()
        ));
        from = stop.location.to_string();
    }

    out
}
