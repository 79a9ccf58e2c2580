//! Outreach scan
//!
//! Searches recent posts, classifies them and queues drafted check-ins for
//! human review in a `support_outreach_*.json` report. Nothing is sent.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use support_core::domains::outreach::{OutreachPipeline, ScanSettings};
use support_core::kernel::{GrokAI, XPlatform};
use support_core::MonitorConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use x_client::XClient;

#[derive(Parser)]
#[command(
    name = "monitor",
    about = "Scan posts, classify sentiment and draft check-ins for review"
)]
struct Cli {
    /// Search query (default: recent English posts, no retweets)
    #[arg(long, default_value = "")]
    query: String,

    /// Maximum number of posts to scan (clamped to 10..=100)
    #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
    max_posts: i64,

    /// Only log what would be queued
    #[arg(long)]
    dry_run: bool,

    /// Directory for the report file (overrides OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,
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

    let cli = Cli::parse();

    let mut config = MonitorConfig::from_env().context("Failed to load configuration")?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let platform = XPlatform::new(
        XClient::new(config.x_bearer_token.clone()).with_base_url(config.x_base_url.clone()),
    );
    let pipeline = OutreachPipeline::new(
        Arc::new(platform),
        Arc::new(GrokAI::from_config(&config.llm)),
        ScanSettings::from_config(&config, cli.dry_run),
    );

    let started = chrono::Local::now();
    println!(
        "{} Starting scan (query: {}, max posts: {}, dry run: {})",
        format!("[{}]", started.format("%Y-%m-%d %H:%M:%S")).dimmed(),
        if cli.query.trim().is_empty() { "recent posts" } else { cli.query.as_str() },
        cli.max_posts,
        cli.dry_run
    );

    let outcome = tokio::select! {
        outcome = pipeline.scan_and_analyze(&cli.query, cli.max_posts) => outcome?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted by user.");
            std::process::exit(1);
        }
    };

    println!();
    println!("{}", "=".repeat(60));
    println!(
        "Scanned {} posts, {} needing support",
        outcome.total_posts_scanned,
        outcome.negative_posts_found.to_string().yellow().bold()
    );
    println!("{}", "=".repeat(60));

    for record in &outcome.records {
        println!();
        println!("  {} @{}", "→".cyan(), record.username.as_deref().unwrap_or("unknown"));
        if let Some(url) = &record.profile_url {
            println!("    Profile: {}", url);
        }
        println!("    Suggested message: {}", record.support_message);
    }

    match &outcome.report_path {
        Some(path) => {
            println!();
            println!("{} Results saved to: {}", "💾".green(), path.display());
            println!("   Drafts are queued for manual review; nothing was sent.");
        }
        None => println!("\nNo drafts produced; no report written."),
    }

    println!(
        "\n{} Scan complete!",
        format!("[{}]", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")).dimmed()
    );
    Ok(())
}
