//! Mock market source for integration testing.
//!
//! A deterministic `MarketSource` that returns canned markets or a forced
//! failure, with no network involved.

use async_trait::async_trait;

use prediction_markets::platforms::MarketSource;
use prediction_markets::types::{NormalizedMarket, OutcomeQuote, Source, SourceError};

pub struct MockSource {
    source: Source,
    markets: Vec<NormalizedMarket>,
    failure: Option<String>,
}

impl MockSource {
    /// A source that succeeds with the given markets.
    pub fn with_markets(source: Source, markets: Vec<NormalizedMarket>) -> Self {
        Self {
            source,
            markets,
            failure: None,
        }
    }

    /// A source that succeeds but matches nothing.
    pub fn empty(source: Source) -> Self {
        Self::with_markets(source, Vec::new())
    }

    /// A source whose fetch always fails with the given message.
    pub fn failing(source: Source, message: &str) -> Self {
        Self {
            source,
            markets: Vec::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl MarketSource for MockSource {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(&self, _keyword: &str) -> Result<Vec<NormalizedMarket>, SourceError> {
        match &self.failure {
            Some(msg) => Err(SourceError::UpstreamFormat(msg.clone())),
            None => Ok(self.markets.clone()),
        }
    }
}

/// Build a normalized market from (outcome, probability) pairs.
pub fn market(source: Source, title: &str, outcomes: &[(&str, Option<f64>)]) -> NormalizedMarket {
    NormalizedMarket::new(
        source,
        title,
        outcomes
            .iter()
            .map(|(name, p)| OutcomeQuote::new(*name, *p))
            .collect(),
    )
}
