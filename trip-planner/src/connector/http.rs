//! Connector for a JSON fare API.
//!
//! The API answers `GET {base_url}?origin=..&destination=..&date=..
//! &transportation_mode=flight&payment_type=..` with
//! `{"price": 200.5, "duration": "2h 30m", "airline": "Alaska"}`.
//! A missing or null price means no fare is offered that day.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Price, format_date};

use super::error::ConnectorError;
use super::parse::parse_duration;
use super::{FareConnector, FareQuery, FareQuote};

/// Configuration for the fare API connector.
#[derive(Debug, Clone, Deserialize)]
pub struct FareApiConfig {
    /// Endpoint answering fare queries
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl FareApiConfig {
    /// Create a new config for the given endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Response body from the fare API.
#[derive(Debug, Deserialize)]
struct FareResponse {
    price: Option<f64>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    airline: Option<String>,
}

/// Fare API client.
#[derive(Debug, Clone)]
pub struct HttpFareConnector {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFareConnector {
    /// Create a new client with the given configuration.
    pub fn new(config: FareApiConfig) -> Result<Self, ConnectorError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    async fn fetch(&self, query: &FareQuery) -> Result<FareResponse, ConnectorError> {
        debug!(
            origin = %query.origin,
            destination = %query.destination,
            date = %query.date,
            "Fetching fare"
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origin", query.origin.as_str()),
                ("destination", query.destination.as_str()),
                ("date", format_date(query.date).as_str()),
                ("transportation_mode", "flight"),
                ("payment_type", query.payment.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ConnectorError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ConnectorError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        decode_fare(&body)
    }
}

fn decode_fare(body: &str) -> Result<FareResponse, ConnectorError> {
    serde_json::from_str(body).map_err(|e| ConnectorError::Json {
        message: e.to_string(),
    })
}

fn to_price(amount: f64) -> Result<Price, ConnectorError> {
    Price::from_amount(amount).map_err(|e| ConnectorError::Json {
        message: e.to_string(),
    })
}

fn to_quote(response: FareResponse) -> Result<FareQuote, ConnectorError> {
    let amount = response.price.ok_or_else(|| ConnectorError::Json {
        message: "missing price".to_string(),
    })?;

    let duration = match response.duration {
        Some(d) => parse_duration(&d)?,
        None => "unknown".to_string(),
    };

    Ok(FareQuote {
        price: to_price(amount)?,
        duration,
        airline: response.airline.unwrap_or_else(|| "unknown".to_string()),
    })
}

impl FareConnector for HttpFareConnector {
    fn name(&self) -> &str {
        "fare_api"
    }

    async fn get_details(&self, query: &FareQuery) -> Result<FareQuote, ConnectorError> {
        to_quote(self.fetch(query).await?)
    }

    async fn get_price(&self, query: &FareQuery) -> Result<Option<Price>, ConnectorError> {
        self.fetch(query).await?.price.map(to_price).transpose()
    }
}
