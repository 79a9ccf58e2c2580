//! Response tracker
//!
//! Bookkeeping for outreach offers, plus the polling loop that hands users
//! who explicitly agree to talk over to the voice support backend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use support_core::domains::tracking::ResponseTracker;
use support_core::kernel::{GrokAI, HttpSupportBackend};
use support_core::TrackerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tracker", about = "Track replies to outreach offers and hand off calls")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll for replies until Ctrl-C
    Monitor {
        /// Seconds between checks (overrides the 300 s default)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// List offers still awaiting a reply
    Pending,
    /// Record that an offer was posted
    RecordOffer {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        tweet_id: String,
        #[arg(long)]
        reply_id: String,
    },
    /// Hand a consenting user to the support backend
    Call {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        phone_number: Option<String>,
        /// JSON object passed to the backend as call context
        #[arg(long)]
        context: Option<String>,
    },
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
    let config = TrackerConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        backend_url = %config.backend_url,
        telephony_url = %config.telephony_url,
        "Tracker configured"
    );

    let backend = Arc::new(HttpSupportBackend::new(config.backend_url.clone()));
    let mut tracker = ResponseTracker::open(&config.storage_path, backend)?;

    match cli.command {
        Command::Monitor { interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or(config.check_interval);
            let ai = GrokAI::from_config(&config.llm);
            tracker.monitor_and_call(&ai, interval).await?;
        }
        Command::Pending => {
            let pending = tracker.get_pending_offers();
            if pending.is_empty() {
                println!("No pending offers.");
            }
            for offer in pending {
                println!(
                    "{} @{} (tweet {}, sent {})",
                    "•".cyan(),
                    offer.username,
                    offer.tweet_id,
                    offer.timestamp.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::RecordOffer {
            user_id,
            username,
            tweet_id,
            reply_id,
        } => {
            tracker.record_offer_sent(&user_id, &username, &tweet_id, &reply_id)?;
            println!("{} Offer recorded for @{}", "✅".green(), username);
        }
        Command::Call {
            user_id,
            username,
            phone_number,
            context,
        } => {
            let context = context
                .map(|c| serde_json::from_str(&c))
                .transpose()
                .context("--context must be a JSON object")?;

            match tracker
                .initiate_call_for_user(&user_id, &username, phone_number.as_deref(), context)
                .await
            {
                Some(call) => {
                    println!("{} Call initiated for @{}", "✅".green(), username);
                    println!("   Conversation ID: {}", call.conversation_id);
                }
                None => {
                    anyhow::bail!("Could not initiate call for @{}", username);
                }
            }
        }
    }

    Ok(())
}
