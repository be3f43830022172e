//! Connector that asks a person for fares.

use std::io::{BufRead, Write};
use std::sync::{Mutex, PoisonError};

use crate::domain::Price;

use super::error::ConnectorError;
use super::parse::{AirlineDirectory, parse_duration, parse_price};
use super::{FareConnector, FareQuery, FareQuote};

/// Prompts for fare details on a line-oriented terminal.
///
/// Generic over the input and output streams so it can be driven from
/// stdin/stdout or from in-memory buffers.
pub struct ManualConnector<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
    airlines: AirlineDirectory,
}

impl<R: BufRead, W: Write> ManualConnector<R, W> {
    pub fn new(input: R, output: W, airlines: AirlineDirectory) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
            airlines,
        }
    }

    /// Print `message` and read one trimmed line of input.
    pub fn prompt(&self, message: &str) -> Result<String, ConnectorError> {
        {
            let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
            write!(output, "{message}")?;
            output.flush()?;
        }

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .read_line(&mut line)?;
        if read == 0 {
            return Err(ConnectorError::InputClosed);
        }

        Ok(line.trim().to_string())
    }

    /// Print a line of output.
    pub fn say(&self, message: &str) -> Result<(), ConnectorError> {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(output, "{message}")?;
        Ok(())
    }

    /// Map an airline name or code to its canonical name, offering the
    /// closest known name when there is no exact match.
    fn match_airline(&self, input: &str) -> Result<String, ConnectorError> {
        if let Some(name) = self.airlines.resolve(input) {
            return Ok(name.to_string());
        }

        if let Some(name) = self.airlines.suggest(input) {
            let answer = self.prompt(&format!("Did you mean '{name}'? (y/n): "))?;
            if answer.eq_ignore_ascii_case("y") {
                return Ok(name.to_string());
            }
        }

        Err(ConnectorError::UnknownAirline(input.to_string()))
    }

    /// Recover the streams.
    pub fn into_inner(self) -> (R, W) {
        (
            self.input.into_inner().unwrap_or_else(PoisonError::into_inner),
            self.output.into_inner().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl<R, W> FareConnector for ManualConnector<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn name(&self) -> &str {
        "manual"
    }

    async fn get_details(&self, query: &FareQuery) -> Result<FareQuote, ConnectorError> {
        self.say(&format!(
            "Enter fare details for {} -> {} on {} ({}):",
            query.origin, query.destination, query.date, query.payment
        ))?;

        let price = parse_price(&self.prompt("Price: ")?)?;
        let duration = parse_duration(&self.prompt("Duration (e.g. 2:30 or 2h 30m): ")?)?;
        let airline = self.match_airline(&self.prompt("Airline name or code: ")?)?;

        Ok(FareQuote {
            price,
            duration,
            airline,
        })
    }

    async fn get_price(&self, query: &FareQuery) -> Result<Option<Price>, ConnectorError> {
        let input = self.prompt(&format!(
            "Price on {} (or 'done' to exit calendar mode): ",
            query.date
        ))?;

        if input.eq_ignore_ascii_case("done") {
            return Ok(None);
        }

        parse_price(&input).map(Some)
    }
}
