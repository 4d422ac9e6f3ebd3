//! Aggregation scenarios: failure isolation, report shapes, and an
//! end-to-end keyword query driven through the real adapter conversions.

use prediction_markets::aggregator::Aggregator;
use prediction_markets::filter::KeywordFilter;
use prediction_markets::platforms::kalshi::{self, EventWithMarkets, KalshiClient};
use prediction_markets::platforms::polymarket::{self, PolymarketClient};
use prediction_markets::platforms::predictit::{self, PredictItClient};
use prediction_markets::platforms::MarketSource;
use prediction_markets::types::{NormalizedMarket, Source};

use crate::mock_source::{market, MockSource};

fn boxed(sources: Vec<MockSource>) -> Vec<Box<dyn MarketSource>> {
    sources
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn MarketSource>)
        .collect()
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_sources_failed_lists_every_error() {
    let aggregator = Aggregator::new(boxed(vec![
        MockSource::failing(Source::Polymarket, "expected `data` array"),
        MockSource::failing(Source::PredictIt, "expected `markets` array"),
        MockSource::failing(Source::Kalshi, "expected `events` array"),
    ]));

    let report = aggregator.aggregate("election").await;

    assert!(report.starts_with("All sources failed:"));
    assert!(report.contains("Polymarket:"));
    assert!(report.contains("PredictIt:"));
    assert!(report.contains("Kalshi:"));
    assert!(!report.contains("##"), "no data sections expected");
}

#[tokio::test]
async fn single_failure_warns_but_keeps_other_data() {
    let aggregator = Aggregator::new(boxed(vec![
        MockSource::with_markets(
            Source::Polymarket,
            vec![market(
                Source::Polymarket,
                "Will Trump win?",
                &[("Yes", Some(0.6)), ("No", Some(0.4))],
            )],
        ),
        MockSource::failing(Source::PredictIt, "connection refused"),
        MockSource::with_markets(
            Source::Kalshi,
            vec![market(
                Source::Kalshi,
                "Senate control",
                &[("Yes", Some(0.25)), ("No", Some(0.75))],
            )],
        ),
    ]));

    let report = aggregator.aggregate("election").await;

    assert!(report.starts_with("Warning: some sources could not be queried:"));
    assert!(report.contains("PredictIt: unexpected response format: connection refused"));
    assert!(report.contains("## Polymarket"));
    assert!(report.contains("**Will Trump win?**"));
    assert!(report.contains("## Kalshi"));
    assert!(report.contains("**Senate control**"));
    assert!(!report.contains("## PredictIt"));
}

#[tokio::test]
async fn failing_source_does_not_suppress_siblings() {
    // Kalshi failing alone: the other two sections must be intact
    let aggregator = Aggregator::new(boxed(vec![
        MockSource::with_markets(
            Source::Polymarket,
            vec![market(Source::Polymarket, "A?", &[("Yes", Some(1.0))])],
        ),
        MockSource::with_markets(
            Source::PredictIt,
            vec![market(Source::PredictIt, "B?", &[("X", Some(0.5))])],
        ),
        MockSource::failing(Source::Kalshi, "boom"),
    ]));

    let report = aggregator.aggregate("").await;
    assert!(report.contains("## Polymarket"));
    assert!(report.contains("## PredictIt"));
    assert!(report.contains("Kalshi: unexpected response format: boom"));
}

// ---------------------------------------------------------------------------
// Report shapes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_matches_yields_neutral_message() {
    let aggregator = Aggregator::new(boxed(vec![
        MockSource::empty(Source::Polymarket),
        MockSource::empty(Source::PredictIt),
        MockSource::empty(Source::Kalshi),
    ]));

    let report = aggregator.aggregate("xyzzy").await;
    assert_eq!(
        report,
        "No current prediction markets found for keyword: \"xyzzy\""
    );
}

#[tokio::test]
async fn no_matches_with_partial_failure_keeps_warning() {
    let aggregator = Aggregator::new(boxed(vec![
        MockSource::empty(Source::Polymarket),
        MockSource::failing(Source::PredictIt, "timeout"),
        MockSource::empty(Source::Kalshi),
    ]));

    let report = aggregator.aggregate("xyzzy").await;
    assert!(report.starts_with("Warning: some sources could not be queried:"));
    assert!(report.contains("PredictIt"));
    assert!(report.contains("No current prediction markets found for keyword: \"xyzzy\""));
}

#[tokio::test]
async fn sections_follow_fixed_source_order() {
    let aggregator = Aggregator::new(boxed(vec![
        MockSource::with_markets(
            Source::Polymarket,
            vec![market(Source::Polymarket, "P?", &[("Yes", Some(0.5))])],
        ),
        MockSource::with_markets(
            Source::PredictIt,
            vec![market(Source::PredictIt, "Q?", &[("X", Some(0.5))])],
        ),
        MockSource::with_markets(
            Source::Kalshi,
            vec![market(Source::Kalshi, "R?", &[("Yes", Some(0.5))])],
        ),
    ]));

    let report = aggregator.aggregate("").await;
    let poly = report.find("## Polymarket").unwrap();
    let predictit = report.find("## PredictIt").unwrap();
    let kalshi = report.find("## Kalshi").unwrap();
    assert!(poly < predictit);
    assert!(predictit < kalshi);
}

#[tokio::test]
async fn empty_sources_are_omitted_from_report() {
    let aggregator = Aggregator::new(boxed(vec![
        MockSource::with_markets(
            Source::Polymarket,
            vec![market(Source::Polymarket, "P?", &[("Yes", Some(0.5))])],
        ),
        MockSource::empty(Source::PredictIt),
        MockSource::empty(Source::Kalshi),
    ]));

    let report = aggregator.aggregate("").await;
    assert!(report.contains("## Polymarket"));
    assert!(!report.contains("## PredictIt"));
    assert!(!report.contains("## Kalshi"));
    assert!(!report.contains("Warning"));
}

// ---------------------------------------------------------------------------
// End-to-end: "election" keyword through real adapter conversions
// ---------------------------------------------------------------------------

fn polymarket_fixture() -> Vec<NormalizedMarket> {
    let raw = serde_json::json!([
        {
            "question": "Who wins the election?",
            "active": true,
            "closed": false,
            "archived": false,
            "tokens": [
                {"outcome": "Alice", "price": 0.6},
                {"outcome": "Bob", "price": 0.4}
            ]
        },
        {
            "question": "Will the election be contested?",
            "active": true,
            "closed": false,
            "archived": false,
            "tokens": [
                {"outcome": "Yes", "price": 0.3},
                {"outcome": "No", "price": 0.3}
            ]
        }
    ]);

    let markets: Vec<polymarket::Market> = serde_json::from_value(raw).unwrap();
    let filter = KeywordFilter::new("election");
    markets
        .into_iter()
        .filter(|m| PolymarketClient::is_current(m, &filter))
        .map(|m| {
            let odds = PolymarketClient::market_odds(&m);
            NormalizedMarket::new(Source::Polymarket, m.question, odds)
        })
        .collect()
}

fn predictit_fixture() -> Vec<NormalizedMarket> {
    let raw = serde_json::json!({
        "name": "2028 election winner",
        "shortName": "ELECTION.2028",
        "status": "Open",
        "contracts": [
            {"shortName": "Frontrunner", "lastTradePrice": 0.55}
        ]
    });

    let market: predictit::Market = serde_json::from_value(raw).unwrap();
    let filter = KeywordFilter::new("election");
    assert!(PredictItClient::keyword_matches(&market, &filter));
    vec![PredictItClient::to_normalized(market)]
}

fn kalshi_fixture() -> Vec<NormalizedMarket> {
    let event: kalshi::Event = serde_json::from_value(serde_json::json!({
        "event_ticker": "KXELECT",
        "title": "Presidential election outcome",
        "sub_title": "",
        "category": "Politics"
    }))
    .unwrap();

    let market: kalshi::Market = serde_json::from_value(serde_json::json!({
        "ticker": "KXELECT-28",
        "status": "open",
        "yes_bid_dollars": "0.2",
        "yes_ask_dollars": "0.3"
    }))
    .unwrap();
    assert!(market.is_tradable());

    KalshiClient::to_normalized(EventWithMarkets {
        event,
        markets: vec![market],
    })
}

#[tokio::test]
async fn end_to_end_election_report() {
    let aggregator = Aggregator::new(boxed(vec![
        MockSource::with_markets(Source::Polymarket, polymarket_fixture()),
        MockSource::with_markets(Source::PredictIt, predictit_fixture()),
        MockSource::with_markets(Source::Kalshi, kalshi_fixture()),
    ]));

    let report = aggregator.aggregate("election").await;

    // Polymarket: [0.6, 0.4] normalizes to 60/40, [0.3, 0.3] to 50/50
    assert!(report.contains("**Who wins the election?**"));
    assert!(report.contains("Alice: 60.0%"));
    assert!(report.contains("Bob: 40.0%"));
    assert!(report.contains("Yes: 50.0% | No: 50.0%"));

    // PredictIt: last trade price displayed directly
    assert!(report.contains("Frontrunner: 55.0%"));

    // Kalshi: yes probability is the bid/ask midpoint
    assert!(report.contains("Yes: 25.0%"));

    assert!(report.contains("## Polymarket"));
    assert!(report.contains("## PredictIt"));
    assert!(report.contains("## Kalshi"));
    assert!(!report.contains("Warning"));
}
