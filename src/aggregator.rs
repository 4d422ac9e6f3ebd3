//! Multi-source aggregation and report rendering.
//!
//! Fans one keyword query out to every configured source concurrently,
//! captures each source's failure independently (a broken upstream never
//! cancels its siblings), and merges the survivors into a single labeled
//! text report in fixed source order.

use futures::future;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::platforms::kalshi::KalshiClient;
use crate::platforms::polymarket::PolymarketClient;
use crate::platforms::predictit::PredictItClient;
use crate::platforms::MarketSource;
use crate::types::{NormalizedMarket, Source, SourceError};

pub struct Aggregator {
    sources: Vec<Box<dyn MarketSource>>,
}

impl Aggregator {
    /// Build an aggregator over an explicit source list. Report sections
    /// follow the order of `sources`.
    pub fn new(sources: Vec<Box<dyn MarketSource>>) -> Self {
        Self { sources }
    }

    /// Build the standard three-source aggregator from configuration,
    /// in fixed order Polymarket → PredictIt → Kalshi. Sources disabled
    /// in config are left out.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, SourceError> {
        let mut sources: Vec<Box<dyn MarketSource>> = Vec::new();
        if cfg.sources.polymarket.enabled {
            sources.push(Box::new(PolymarketClient::new(
                &cfg.http,
                &cfg.sources.polymarket,
            )?));
        }
        if cfg.sources.predictit.enabled {
            sources.push(Box::new(PredictItClient::new(
                &cfg.http,
                &cfg.sources.predictit,
            )?));
        }
        if cfg.sources.kalshi.enabled {
            sources.push(Box::new(KalshiClient::new(&cfg.http, &cfg.sources.kalshi)?));
        }
        Ok(Self::new(sources))
    }

    /// Query every source for `keyword` and render the merged report.
    ///
    /// The join is non-short-circuiting: all fetches run to completion and
    /// each failure is recorded as a labeled error rather than propagated.
    pub async fn aggregate(&self, keyword: &str) -> String {
        let fetches = self
            .sources
            .iter()
            .map(|s| async move { (s.source(), s.fetch(keyword).await) });
        let results: Vec<(Source, Result<Vec<NormalizedMarket>, SourceError>)> =
            future::join_all(fetches).await;

        let mut failures: Vec<String> = Vec::new();
        let mut sections: Vec<String> = Vec::new();

        for (source, result) in results {
            match result {
                Ok(markets) if markets.is_empty() => {
                    info!(source = %source, "No matching markets");
                }
                Ok(markets) => {
                    info!(source = %source, count = markets.len(), "Source fetch complete");
                    sections.push(render_section(source, &markets));
                }
                Err(e) => {
                    warn!(source = %source, error = %e, "Source fetch failed");
                    failures.push(format!("{source}: {e}"));
                }
            }
        }

        render_report(keyword, &failures, &sections, self.sources.len())
    }
}

fn render_section(source: Source, markets: &[NormalizedMarket]) -> String {
    let entries: Vec<String> = markets.iter().map(|m| m.to_string()).collect();
    format!("## {source}\n\n{}", entries.join("\n\n"))
}

fn render_report(
    keyword: &str,
    failures: &[String],
    sections: &[String],
    source_count: usize,
) -> String {
    let bullet_list = |items: &[String]| -> String {
        items
            .iter()
            .map(|i| format!("- {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    // Every source failed: no data to show, list what went wrong.
    if !failures.is_empty() && failures.len() == source_count {
        return format!("All sources failed:\n{}", bullet_list(failures));
    }

    let mut report = String::new();
    if !failures.is_empty() {
        report.push_str(&format!(
            "Warning: some sources could not be queried:\n{}\n\n",
            bullet_list(failures)
        ));
    }

    if sections.is_empty() {
        report.push_str(&format!(
            "No current prediction markets found for keyword: \"{keyword}\""
        ));
    } else {
        report.push_str(&sections.join("\n\n"));
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
