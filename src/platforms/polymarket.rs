//! Polymarket adapter.
//!
//! Uses the CLOB market list (no auth required): `GET {base}/markets?limit=N`
//! returning `{"data": [...]}`. Each market carries an ordered token list
//! with per-outcome prices; some response variants instead deliver outcomes
//! and prices as parallel JSON-encoded string arrays, which are decoded
//! per-market before normalization.
//!
//! CLOB API: https://clob.polymarket.com

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{HttpConfig, PolymarketConfig};
use crate::filter::KeywordFilter;
use crate::odds;
use crate::platforms::{build_http_client, MarketSource};
use crate::types::{NormalizedMarket, OutcomeQuote, Source, SourceError};

// ---------------------------------------------------------------------------
// CLOB response types
// ---------------------------------------------------------------------------

/// One outcome token of a Polymarket market.
#[derive(Debug, Deserialize, Clone)]
pub struct Token {
    #[serde(default)]
    pub token_id: String,
    #[serde(default)]
    pub outcome: String,
    /// Raw price in [0, 1]. Token prices across a market need not sum to 1.
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub winner: bool,
}

/// A market as returned by the CLOB list endpoint. Only the fields we use
/// are deserialized; everything defaults so a sparse record still parses.
#[derive(Debug, Deserialize, Clone)]
pub struct Market {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "slug")]
    pub market_slug: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub tokens: Vec<Token>,
    /// Alternate shape: outcome names as a JSON-encoded string array,
    /// e.g. `"[\"Yes\",\"No\"]"`.
    #[serde(default)]
    pub outcomes: Option<String>,
    /// Alternate shape: prices paired positionally with `outcomes`,
    /// e.g. `"[\"0.65\",\"0.35\"]"`.
    #[serde(default, alias = "outcomePrices")]
    pub outcome_prices: Option<String>,
}

/// A market plus its derived outcome → probability mapping.
#[derive(Debug, Clone)]
pub struct MarketWithOdds {
    pub market: Market,
    pub odds: Vec<OutcomeQuote>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct PolymarketClient {
    http: reqwest::Client,
    base_url: String,
    limit: u32,
}

impl PolymarketClient {
    pub fn new(http: &HttpConfig, cfg: &PolymarketConfig) -> Result<Self, SourceError> {
        Ok(Self {
            http: build_http_client(http)?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            limit: cfg.limit,
        })
    }

    /// Fetch the raw market list from the CLOB endpoint.
    async fn fetch_raw(&self) -> Result<Vec<Market>, SourceError> {
        let url = format!("{}/markets", self.base_url);
        debug!(url = %url, limit = self.limit, "Fetching Polymarket markets");

        let resp = self
            .http
            .get(&url)
            .query(&[("limit", self.limit.to_string())])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = resp.json().await?;
        let data = body
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                SourceError::UpstreamFormat("expected `data` array in Polymarket response".into())
            })?;

        serde_json::from_value(Value::Array(data))
            .map_err(|e| SourceError::UpstreamFormat(format!("bad `data` element: {e}")))
    }

    /// Fetch, filter to currently tradable keyword matches, and attach odds.
    ///
    /// Upstream order is preserved and the result is capped at the
    /// configured limit.
    pub async fn fetch_markets(&self, keyword: &str) -> Result<Vec<MarketWithOdds>, SourceError> {
        let markets = self.fetch_raw().await?;
        let filter = KeywordFilter::new(keyword);

        let current: Vec<MarketWithOdds> = markets
            .into_iter()
            .filter(|m| Self::is_current(m, &filter))
            .take(self.limit as usize)
            .map(|market| {
                let odds = Self::market_odds(&market);
                MarketWithOdds { market, odds }
            })
            .collect();

        info!(count = current.len(), "Polymarket markets after filtering");
        Ok(current)
    }

    /// A market is current iff it is active, neither closed nor archived,
    /// and the keyword matches its question, description, or slug.
    pub fn is_current(market: &Market, filter: &KeywordFilter) -> bool {
        market.active
            && !market.closed
            && !market.archived
            && filter.matches_any([
                market.question.as_str(),
                market.description.as_str(),
                market.market_slug.as_str(),
            ])
    }

    /// Derive the normalized outcome probabilities for one market.
    ///
    /// Token prices take precedence; otherwise the string-encoded parallel
    /// arrays are decoded. A malformed string array degrades to an empty
    /// odds mapping for this market only.
    pub fn market_odds(market: &Market) -> Vec<OutcomeQuote> {
        if !market.tokens.is_empty() {
            let prices: Vec<f64> = market.tokens.iter().map(|t| t.price).collect();
            let probs = odds::normalize(&prices);
            return market
                .tokens
                .iter()
                .zip(probs)
                .map(|(t, p)| OutcomeQuote::new(t.outcome.clone(), Some(p)))
                .collect();
        }

        match (&market.outcomes, &market.outcome_prices) {
            (Some(names), Some(prices)) => {
                match Self::parse_outcome_strings(names, prices) {
                    Ok(pairs) => {
                        let prices: Vec<f64> = pairs.iter().map(|(_, p)| *p).collect();
                        let probs = odds::normalize(&prices);
                        pairs
                            .into_iter()
                            .zip(probs)
                            .map(|((name, _), p)| OutcomeQuote::new(name, Some(p)))
                            .collect()
                    }
                    Err(e) => {
                        warn!(
                            question = %market.question,
                            error = %e,
                            "Skipping odds for market with malformed outcome arrays"
                        );
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    /// Decode the parallel string-encoded arrays into (outcome, price)
    /// pairs, positionally, up to the shorter array's length.
    pub fn parse_outcome_strings(
        names: &str,
        prices: &str,
    ) -> Result<Vec<(String, f64)>, SourceError> {
        let names: Vec<String> =
            serde_json::from_str(names).map_err(|e| SourceError::Parse(e.to_string()))?;
        let raw_prices: Vec<Value> =
            serde_json::from_str(prices).map_err(|e| SourceError::Parse(e.to_string()))?;

        let mut prices = Vec::with_capacity(raw_prices.len());
        for v in &raw_prices {
            let p = match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            }
            .ok_or_else(|| SourceError::Parse(format!("unreadable price value: {v}")))?;
            prices.push(p);
        }

        Ok(names.into_iter().zip(prices).collect())
    }
}

// ---------------------------------------------------------------------------
// MarketSource trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl MarketSource for PolymarketClient {
    fn source(&self) -> Source {
        Source::Polymarket
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<NormalizedMarket>, SourceError> {
        let markets = self.fetch_markets(keyword).await?;
        Ok(markets
            .into_iter()
            .map(|mwo| NormalizedMarket::new(Source::Polymarket, mwo.market.question, mwo.odds))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
