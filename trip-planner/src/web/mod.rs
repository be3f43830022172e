//! Web layer for the trip planner.
//!
//! Provides HTTP endpoints for browsing known legs and planning trips.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, ReloadError};
