//! Fetch trending topics for a WOEID.
//!
//! Common WOEIDs: 1 Worldwide, 23424977 United States, 23424975 United
//! Kingdom, 23424748 Canada, 23424829 Germany, 23424856 Japan.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use support_core::domains::trends::{fetch_trends_by_woeid, print_trends, DEFAULT_MAX_TRENDS};
use support_core::config::DEFAULT_X_BASE_URL;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use x_client::XClient;

#[derive(Clone, Copy, ValueEnum)]
enum TrendField {
    TrendName,
    TweetCount,
}

impl TrendField {
    fn as_api_field(self) -> &'static str {
        match self {
            TrendField::TrendName => "trend_name",
            TrendField::TweetCount => "tweet_count",
        }
    }
}

#[derive(Parser)]
#[command(name = "trends", about = "Fetch X trends by WOEID")]
struct Cli {
    /// WOEID (Where On Earth ID) of the location
    woeid: i64,

    /// Maximum number of trends to return
    #[arg(long, default_value_t = DEFAULT_MAX_TRENDS, value_parser = clap::value_parser!(u32).range(1..=50))]
    max_trends: u32,

    /// Bearer token (or set X_API_BEARER_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Fields to include in the response
    #[arg(long, value_enum, num_args = 1.., default_values_t = [TrendField::TrendName, TrendField::TweetCount])]
    fields: Vec<TrendField>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,support_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(token) = cli
        .token
        .or_else(|| std::env::var("X_API_BEARER_TOKEN").ok())
        .filter(|t| !t.is_empty())
    else {
        anyhow::bail!(
            "Bearer token is required. Set X_API_BEARER_TOKEN or use --token."
        );
    };

    let base_url =
        std::env::var("X_API_BASE_URL").unwrap_or_else(|_| DEFAULT_X_BASE_URL.to_string());
    let client = XClient::new(token).with_base_url(base_url);
    let fields: Vec<&str> = cli.fields.iter().map(|f| f.as_api_field()).collect();

    let response = tokio::select! {
        response = fetch_trends_by_woeid(&client, cli.woeid, cli.max_trends, &fields) => response?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted by user.");
            std::process::exit(1);
        }
    };

    print_trends(&response);
    Ok(())
}
