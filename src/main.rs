//! Command-line entry point.
//!
//! Reads the keyword from argv, runs one aggregate query, and prints the
//! report to stdout. Logs go to stderr so a host capturing stdout as tool
//! output never sees them.

use anyhow::Result;
use tracing::info;

use prediction_markets::aggregator::Aggregator;
use prediction_markets::config::AppConfig;
use prediction_markets::tool;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load_or_default("config.toml")?;
    init_logging();

    let keyword = std::env::args().nth(1).unwrap_or_default();
    info!(keyword = %keyword, "Querying prediction markets");

    let aggregator = Aggregator::from_config(&cfg)?;
    let report = tool::handle(&aggregator, &keyword).await?;

    println!("{report}");
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("prediction_markets=info"));

    let json_logging = std::env::var("PREDICTION_MARKETS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
