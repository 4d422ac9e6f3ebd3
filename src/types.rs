//! Shared types for the prediction-markets aggregator.
//!
//! Every upstream platform speaks its own JSON dialect; the adapters in
//! `platforms` map each of them into the `NormalizedMarket` shape defined
//! here so the aggregator never has to branch on where data came from.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Source labels
// ---------------------------------------------------------------------------

/// The upstream platforms we aggregate, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Polymarket,
    PredictIt,
    Kalshi,
}

impl Source {
    /// All sources in the fixed order they appear in the report.
    pub const ALL: &'static [Source] = &[Source::Polymarket, Source::PredictIt, Source::Kalshi];
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Polymarket => write!(f, "Polymarket"),
            Source::PredictIt => write!(f, "PredictIt"),
            Source::Kalshi => write!(f, "Kalshi"),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized market view
// ---------------------------------------------------------------------------

/// One named outcome of a market and its probability estimate.
///
/// `None` means the platform had no usable quote for this outcome (e.g. a
/// PredictIt contract that has never traded); it renders as "n/a".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeQuote {
    pub name: String,
    pub probability: Option<f64>,
}

impl OutcomeQuote {
    pub fn new(name: impl Into<String>, probability: Option<f64>) -> Self {
        Self {
            name: name.into(),
            probability,
        }
    }
}

impl fmt::Display for OutcomeQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.probability {
            Some(p) => write!(f, "{}: {:.1}%", self.name, p * 100.0),
            None => write!(f, "{}: n/a", self.name),
        }
    }
}

/// A market from any platform reduced to the common view the report needs:
/// where it came from, what it asks, and its outcomes in upstream order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedMarket {
    pub source: Source,
    pub title: String,
    pub outcomes: Vec<OutcomeQuote>,
}

impl NormalizedMarket {
    pub fn new(source: Source, title: impl Into<String>, outcomes: Vec<OutcomeQuote>) -> Self {
        Self {
            source,
            title: title.into(),
            outcomes,
        }
    }
}

impl fmt::Display for NormalizedMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quotes: Vec<String> = self.outcomes.iter().map(|o| o.to_string()).collect();
        write!(f, "**{}**\n{}", self.title, quotes.join(" | "))
    }
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Errors a single source fetch can fail with.
///
/// Source-level failures (the whole fetch) surface to the aggregator as a
/// labeled error; item-level failures (one market's embedded JSON, one
/// Kalshi event's market lookup) are degraded locally and never reach here.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP-status failure talking to the upstream.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not have the expected top-level shape.
    #[error("unexpected response format: {0}")]
    UpstreamFormat(String),

    /// Malformed embedded JSON inside an otherwise well-formed response.
    #[error("malformed embedded JSON: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
