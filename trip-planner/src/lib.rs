//! Trip planner.
//!
//! Finds the cheapest round trip that visits a set of places, staying a
//! chosen number of days at each and avoiding blocked-out dates, using fares
//! collected into a local cache.

pub mod cache;
pub mod config;
pub mod connector;
pub mod domain;
pub mod legs;
pub mod logging;
pub mod lookup;
pub mod planner;
pub mod query;
pub mod web;
