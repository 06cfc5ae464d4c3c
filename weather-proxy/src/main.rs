//! Binary crate for the `weather-proxy` service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the lookup endpoint over HTTP
//! - Interactive configuration
//! - Logging setup

use clap::Parser;

mod cli;
mod http;

/// Set to any value to emit JSON log lines.
const LOG_JSON_ENV: &str = "WEATHER_PROXY_LOG_JSON";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenv::dotenv();

    init_logging();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weather_proxy=info,weather_proxy_core=info"));

    // stdout is reserved for `lookup` output
    if std::env::var_os(LOG_JSON_ENV).is_some() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).with_writer(std::io::stderr).init();
    }
}
