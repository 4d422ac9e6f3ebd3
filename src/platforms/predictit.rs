//! PredictIt adapter.
//!
//! One unauthenticated endpoint: `GET {base}/api/marketdata/all/` returning
//! `{"markets": [...]}`. Markets carry contracts whose `lastTradePrice` is
//! already a probability in [0, 1] (or null when the contract has never
//! traded), so no normalization happens here; the rendering layer shows the
//! price directly or "n/a".
//!
//! The observed upstream marks tradable markets with the literal status
//! "Open" (capitalized); the match is deliberately case-sensitive.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{HttpConfig, PredictItConfig};
use crate::filter::KeywordFilter;
use crate::platforms::{build_http_client, MarketSource};
use crate::types::{NormalizedMarket, OutcomeQuote, Source, SourceError};

const OPEN_STATUS: &str = "Open";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(default)]
    pub short_name: String,
    /// Last trade price in [0, 1]; `None` means the contract has not traded.
    #[serde(default)]
    pub last_trade_price: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub contracts: Vec<Contract>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct PredictItClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictItClient {
    pub fn new(http: &HttpConfig, cfg: &PredictItConfig) -> Result<Self, SourceError> {
        Ok(Self {
            http: build_http_client(http)?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all markets and keep only those with status exactly "Open".
    ///
    /// No keyword filtering here; the `MarketSource` impl applies it after
    /// the fetch.
    pub async fn fetch_markets(&self) -> Result<Vec<Market>, SourceError> {
        let url = format!("{}/api/marketdata/all/", self.base_url);
        debug!(url = %url, "Fetching PredictIt markets");

        let resp = self.http.get(&url).send().await?.error_for_status()?;

        let body: Value = resp.json().await?;
        let markets = body
            .get("markets")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                SourceError::UpstreamFormat(
                    "expected `markets` array in PredictIt response".into(),
                )
            })?;

        let markets: Vec<Market> = serde_json::from_value(Value::Array(markets))
            .map_err(|e| SourceError::UpstreamFormat(format!("bad `markets` element: {e}")))?;

        let open: Vec<Market> = markets.into_iter().filter(Self::is_open).collect();

        info!(count = open.len(), "Open PredictIt markets");
        Ok(open)
    }

    /// Whether a market is tradable. The observed upstream always reports
    /// exactly "Open", so this match is case-sensitive on purpose.
    pub fn is_open(market: &Market) -> bool {
        market.status == OPEN_STATUS
    }

    /// Keyword match over the market's name and short name.
    pub fn keyword_matches(market: &Market, filter: &KeywordFilter) -> bool {
        filter.matches_any([market.name.as_str(), market.short_name.as_str()])
    }

    /// Convert an open market to the common report view. Last trade prices
    /// pass through untouched.
    pub fn to_normalized(market: Market) -> NormalizedMarket {
        let outcomes = market
            .contracts
            .into_iter()
            .map(|c| OutcomeQuote::new(c.short_name, c.last_trade_price))
            .collect();
        NormalizedMarket::new(Source::PredictIt, market.name, outcomes)
    }
}

// ---------------------------------------------------------------------------
// MarketSource trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl MarketSource for PredictItClient {
    fn source(&self) -> Source {
        Source::PredictIt
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<NormalizedMarket>, SourceError> {
        let markets = self.fetch_markets().await?;
        let filter = KeywordFilter::new(keyword);
        Ok(markets
            .into_iter()
            .filter(|m| Self::keyword_matches(m, &filter))
            .map(Self::to_normalized)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
