//! Fare connector error types.

/// Errors that can occur when fetching a fare.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Fare API rejected the credentials
    #[error("unauthorized: check the fare API configuration")]
    Unauthorized,

    /// Rate limited by the fare API
    #[error("rate limited by fare API")]
    RateLimited,

    /// Fare API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Reading or writing the terminal failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended while a fare was being entered
    #[error("input closed")]
    InputClosed,

    /// No number found where a price was expected
    #[error("invalid price format: {0:?}")]
    InvalidPrice(String),

    /// Not a recognizable duration
    #[error("invalid duration format: {0:?}")]
    InvalidDuration(String),

    /// Airline not in the directory, or suggestion declined
    #[error("airline not recognized: {0:?}")]
    UnknownAirline(String),
}
