//! prediction-markets: aggregated live odds from Polymarket, PredictIt
//! and Kalshi behind a single keyword-query tool.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod aggregator;
pub mod config;
pub mod filter;
pub mod odds;
pub mod platforms;
pub mod tool;
pub mod types;
