//! Record fares into the leg cache.
//!
//! Usage: `add-legs [manual|fare_api]`
//!
//! Asks for a route and a date, then records the fare. With the `manual`
//! connector (the default) the fare details are typed in; with `fare_api`
//! they are fetched from the API in `connectors.fare_api`. Entering `cal`
//! instead of a date walks a calendar of fares: one price per day from a
//! start date until the connector has no more.

use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use std::process::ExitCode;

use tracing::{error, info};

use trip_planner::cache::LegCache;
use trip_planner::config::{AppConfig, ConnectorKind};
use trip_planner::connector::{
    ConnectorError, FareConnector, FareQuery, HttpFareConnector, ManualConnector,
};
use trip_planner::domain::{LocationCode, parse_date};
use trip_planner::logging;
use trip_planner::lookup::{FareLookup, LookupError};

/// Longest calendar walked in one go.
const MAX_CALENDAR_DAYS: u32 = 366;

type Terminal = ManualConnector<BufReader<Stdin>, Stdout>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let kind = match std::env::args().nth(1) {
        Some(name) => match ConnectorKind::from_name(&name) {
            Ok(kind) => kind,
            Err(e) => {
                eprintln!("Usage: add-legs [manual|fare_api]");
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => ConnectorKind::default(),
    };

    let terminal = || {
        ManualConnector::new(
            BufReader::new(std::io::stdin()),
            std::io::stdout(),
            config.airline_directory(),
        )
    };
    let cache = LegCache::new(config.cache_config());

    let outcome = match kind {
        ConnectorKind::Manual => {
            let lookup = FareLookup::new(terminal(), cache);
            run(lookup.connector(), &lookup).await
        }
        ConnectorKind::FareApi => {
            let connector = match config
                .fare_api()
                .map_err(|e| e.to_string())
                .and_then(|api| HttpFareConnector::new(api.clone()).map_err(|e| e.to_string()))
            {
                Ok(connector) => connector,
                Err(e) => {
                    error!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            info!(connector = connector.name(), "Fetching fares from the fare API");
            let term: Terminal = terminal();
            run(&term, &FareLookup::new(connector, cache)).await
        }
    };

    match outcome {
        Ok(()) | Err(LookupError::Connector(ConnectorError::InputClosed)) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Prompt for routes on `term` and record their fares through `lookup`.
async fn run<R, W, C>(
    term: &ManualConnector<R, W>,
    lookup: &FareLookup<C>,
) -> Result<(), LookupError>
where
    R: BufRead,
    W: Write,
    C: FareConnector,
{
    loop {
        let origin = term.prompt("Origin code (or 'done' to finish): ")?;
        if origin.eq_ignore_ascii_case("done") {
            return Ok(());
        }
        let destination = term.prompt("Destination code: ")?;

        let (origin, destination) = match (
            LocationCode::parse_normalized(&origin),
            LocationCode::parse_normalized(&destination),
        ) {
            (Ok(o), Ok(d)) => (o, d),
            (Err(e), _) | (_, Err(e)) => {
                term.say(&format!("{e}"))?;
                continue;
            }
        };

        let date = term.prompt("Date (YYYY-MM-DD, or 'cal' for a calendar of fares): ")?;
        let calendar = date.eq_ignore_ascii_case("cal");
        let date = if calendar {
            term.prompt("Calendar start date (YYYY-MM-DD): ")?
        } else {
            date
        };
        let date = match parse_date(&date) {
            Ok(date) => date,
            Err(e) => {
                term.say(&format!("{e}"))?;
                continue;
            }
        };

        let query = FareQuery::new(origin, destination, date);

        let outcome = if calendar {
            lookup
                .record_calendar(&query, MAX_CALENDAR_DAYS)
                .await
                .map(|legs| format!("Recorded {} fares. Exiting calendar mode.", legs.len()))
        } else {
            lookup.lookup(&query, true).await.map(|leg| {
                format!(
                    "Recorded {} -> {} on {} at {}.",
                    leg.origin, leg.destination, leg.date, leg.price
                )
            })
        };

        match outcome {
            Ok(message) => term.say(&message)?,
            Err(LookupError::Connector(ConnectorError::InputClosed)) => return Ok(()),
            Err(LookupError::Connector(e)) => term.say(&format!("Error: {e}"))?,
            Err(e) => return Err(e),
        }
    }
}
