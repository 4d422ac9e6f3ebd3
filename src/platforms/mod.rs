//! Platform adapters.
//!
//! Defines the `MarketSource` trait and provides one adapter per upstream:
//! - Polymarket: CLOB market list, multi-outcome token prices
//! - PredictIt: market/contract list with last-trade prices
//! - Kalshi: event/market split with bid/ask/last quoting

pub mod kalshi;
pub mod polymarket;
pub mod predictit;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::types::{NormalizedMarket, Source, SourceError};

/// Abstraction over a prediction-market platform.
///
/// Each implementor owns the full raw-to-normalized pipeline for its
/// upstream: request building, shape validation, tradability filtering,
/// keyword matching, and odds derivation. The aggregator only sees
/// `NormalizedMarket`s and the source label.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Source label for report sections and error messages.
    fn source(&self) -> Source;

    /// Fetch the currently tradable markets matching `keyword`.
    ///
    /// An empty keyword matches every market. Results preserve upstream
    /// ordering.
    async fn fetch(&self, keyword: &str) -> Result<Vec<NormalizedMarket>, SourceError>;
}

/// Build the reqwest client an adapter uses: fixed user-agent plus an
/// explicit timeout so one hanging upstream can't stall the whole report.
pub(crate) fn build_http_client(http: &HttpConfig) -> Result<Client, SourceError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .user_agent(http.user_agent.clone())
        .build()?)
}
