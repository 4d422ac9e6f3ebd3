//! Kalshi adapter.
//!
//! Kalshi splits listings into events and their markets, fetched from two
//! endpoints: `GET {base}/trade-api/v2/events` and
//! `GET {base}/trade-api/v2/markets?event_ticker=<ticker>`. The composite
//! fetch filters events by keyword, then pulls each surviving event's
//! markets concurrently (capped to bound fan-out against upstream rate
//! limits) and drops events that end up with no tradable markets.
//!
//! Price fields arrive as decimal strings that may be absent; the yes and
//! no probabilities are derived independently from their own side's quotes
//! and intentionally need not sum to 1; that mirrors upstream quoting,
//! not a probability law.

use async_trait::async_trait;
use futures::future;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{HttpConfig, KalshiConfig};
use crate::filter::KeywordFilter;
use crate::odds;
use crate::platforms::{build_http_client, MarketSource};
use crate::types::{NormalizedMarket, OutcomeQuote, Source, SourceError};

/// At most this many keyword-matched events get their markets fetched.
const MAX_EVENT_FANOUT: usize = 20;

/// Statuses that always count as tradable (case-insensitive).
const TRADABLE_STATUSES: &[&str] = &["open", "active", "live"];

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct Event {
    #[serde(default)]
    pub event_ticker: String,
    #[serde(default)]
    pub series_ticker: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sub_title: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Market {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub yes_bid_dollars: Option<String>,
    #[serde(default)]
    pub yes_ask_dollars: Option<String>,
    #[serde(default)]
    pub no_bid_dollars: Option<String>,
    #[serde(default)]
    pub no_ask_dollars: Option<String>,
    #[serde(default)]
    pub last_price_dollars: Option<String>,
    #[serde(default)]
    pub yes_sub_title: Option<String>,
    #[serde(default)]
    pub no_sub_title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
}

/// An event enriched with its fetched markets. Only events with at least
/// one surviving market are worth keeping.
#[derive(Debug, Clone)]
pub struct EventWithMarkets {
    pub event: Event,
    pub markets: Vec<Market>,
}

impl Event {
    /// Keyword match over title, sub-title, and category.
    pub fn keyword_matches(&self, filter: &KeywordFilter) -> bool {
        filter.matches_any([
            self.title.as_str(),
            self.sub_title.as_str(),
            self.category.as_str(),
        ])
    }
}

impl Market {
    /// Quoted bid/ask sides count as present even at 0.00; a zero side
    /// still anchors the midpoint.
    pub fn yes_bid(&self) -> Option<f64> {
        parse_dollars(&self.yes_bid_dollars)
    }

    pub fn yes_ask(&self) -> Option<f64> {
        parse_dollars(&self.yes_ask_dollars)
    }

    pub fn no_bid(&self) -> Option<f64> {
        parse_dollars(&self.no_bid_dollars)
    }

    pub fn no_ask(&self) -> Option<f64> {
        parse_dollars(&self.no_ask_dollars)
    }

    /// A last trade of 0.00 means no trade has happened; only nonzero
    /// values count.
    pub fn last_price(&self) -> Option<f64> {
        parse_positive_dollars(&self.last_price_dollars)
    }

    /// Whether this market counts as tradable.
    ///
    /// Status open/active/live always qualifies. Otherwise any nonzero
    /// yes-side or last-trade pricing qualifies, unless the status is
    /// explicitly "closed" or "cancelled"; upstream status fields are
    /// inconsistent enough to need this permissive fallback.
    pub fn is_tradable(&self) -> bool {
        let status = self
            .status
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        if TRADABLE_STATUSES.contains(&status.as_str()) {
            return true;
        }

        let has_pricing = parse_positive_dollars(&self.yes_ask_dollars).is_some()
            || parse_positive_dollars(&self.yes_bid_dollars).is_some()
            || self.last_price().is_some();

        has_pricing && status != "closed" && status != "cancelled"
    }

    /// Yes-side probability estimate: bid/ask midpoint, then last trade,
    /// then a single quoted side.
    pub fn yes_probability(&self) -> Option<f64> {
        odds::quote_estimate(self.yes_bid(), self.yes_ask(), self.last_price())
    }

    /// No-side probability estimate, derived from the no-side quotes;
    /// falls back to `1 - yes` only when no direct no-side quote exists.
    pub fn no_probability(&self) -> Option<f64> {
        odds::quote_estimate(self.no_bid(), self.no_ask(), None)
            .or_else(|| self.yes_probability().map(|y| 1.0 - y))
    }

    /// Human-readable label distinguishing this market within its event.
    pub fn label(&self) -> &str {
        for candidate in [&self.yes_sub_title, &self.subtitle] {
            if let Some(s) = candidate {
                if !s.is_empty() {
                    return s;
                }
            }
        }
        &self.ticker
    }
}

/// Decimal-string-or-absent price field. Unparseable values read as absent.
fn parse_dollars(field: &Option<String>) -> Option<f64> {
    field.as_deref().and_then(|s| s.parse::<f64>().ok())
}

/// Like `parse_dollars` but zero also reads as absent, for fields where a
/// quoted 0.00 carries no information (last trade, the tradability check).
fn parse_positive_dollars(field: &Option<String>) -> Option<f64> {
    parse_dollars(field).filter(|v| *v > 0.0)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct KalshiClient {
    http: reqwest::Client,
    base_url: String,
}

impl KalshiClient {
    pub fn new(http: &HttpConfig, cfg: &KalshiConfig) -> Result<Self, SourceError> {
        Ok(Self {
            http: build_http_client(http)?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all events (stage 1 of the two-stage fetch).
    pub async fn fetch_events(&self) -> Result<Vec<Event>, SourceError> {
        let url = format!("{}/trade-api/v2/events", self.base_url);
        debug!(url = %url, "Fetching Kalshi events");

        let resp = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await?
            .error_for_status()?;

        let body: Value = resp.json().await?;
        let events = body
            .get("events")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                SourceError::UpstreamFormat("expected `events` array in Kalshi response".into())
            })?;

        serde_json::from_value(Value::Array(events))
            .map_err(|e| SourceError::UpstreamFormat(format!("bad `events` element: {e}")))
    }

    /// Fetch the tradable markets of one event (stage 2).
    ///
    /// Any transport or parse failure here degrades to an empty list: one
    /// event's broken market lookup must not abort the whole batch.
    pub async fn fetch_markets_for_event(&self, event_ticker: &str) -> Vec<Market> {
        match self.try_fetch_markets(event_ticker).await {
            Ok(markets) => markets.into_iter().filter(Market::is_tradable).collect(),
            Err(e) => {
                warn!(
                    event_ticker = %event_ticker,
                    error = %e,
                    "Kalshi market lookup failed, skipping event"
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch_markets(&self, event_ticker: &str) -> Result<Vec<Market>, SourceError> {
        let url = format!("{}/trade-api/v2/markets", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(&[("event_ticker", event_ticker)])
            .header("accept", "application/json")
            .send()
            .await?
            .error_for_status()?;

        let body: Value = resp.json().await?;
        let markets = body
            .get("markets")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                SourceError::UpstreamFormat("expected `markets` array in Kalshi response".into())
            })?;

        serde_json::from_value(Value::Array(markets))
            .map_err(|e| SourceError::UpstreamFormat(format!("bad `markets` element: {e}")))
    }

    /// Composite fetch: keyword-matched events with their tradable markets.
    ///
    /// Market lookups for the (at most `MAX_EVENT_FANOUT`) matched events
    /// run concurrently. Events whose market list comes back empty are
    /// dropped, since they carry no odds information.
    pub async fn fetch_events_with_markets(
        &self,
        keyword: &str,
    ) -> Result<Vec<EventWithMarkets>, SourceError> {
        let events = self.fetch_events().await?;
        let filter = KeywordFilter::new(keyword);

        let matched: Vec<Event> = events
            .into_iter()
            .filter(|e| e.keyword_matches(&filter))
            .take(MAX_EVENT_FANOUT)
            .collect();

        let lookups = matched.into_iter().map(|event| async move {
            let markets = self.fetch_markets_for_event(&event.event_ticker).await;
            EventWithMarkets { event, markets }
        });

        let enriched = drop_empty_events(future::join_all(lookups).await);

        info!(count = enriched.len(), "Kalshi events with tradable markets");
        Ok(enriched)
    }

    /// Convert an enriched event to the common report view, one entry per
    /// market.
    pub fn to_normalized(event_with_markets: EventWithMarkets) -> Vec<NormalizedMarket> {
        let EventWithMarkets { event, markets } = event_with_markets;
        markets
            .into_iter()
            .map(|m| {
                let label = m.label();
                let title = if label.is_empty() || markets_share_title(&event, label) {
                    event.title.clone()
                } else {
                    format!("{} ({label})", event.title)
                };
                let outcomes = vec![
                    OutcomeQuote::new("Yes", m.yes_probability()),
                    OutcomeQuote::new("No", m.no_probability()),
                ];
                NormalizedMarket::new(Source::Kalshi, title, outcomes)
            })
            .collect()
    }
}

/// A market label that just repeats the event title adds nothing.
fn markets_share_title(event: &Event, label: &str) -> bool {
    label.eq_ignore_ascii_case(&event.title)
}

/// Drop events whose market list came back empty. An event with matching
/// text but no tradable markets carries no odds and would only add noise.
fn drop_empty_events(enriched: Vec<EventWithMarkets>) -> Vec<EventWithMarkets> {
    enriched
        .into_iter()
        .filter(|e| !e.markets.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// MarketSource trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl MarketSource for KalshiClient {
    fn source(&self) -> Source {
        Source::Kalshi
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<NormalizedMarket>, SourceError> {
        let events = self.fetch_events_with_markets(keyword).await?;
        Ok(events.into_iter().flat_map(Self::to_normalized).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
