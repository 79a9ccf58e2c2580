//! Ask Twilio to dial a user and connect the call to the voice webhook.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use support_core::TwilioConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twilio::{append_query_param, TwilioOptions, TwilioService};

#[derive(Parser)]
#[command(name = "place_call", about = "Initiate a support call via Twilio")]
struct Cli {
    /// Number to call, E.164 format
    #[arg(long)]
    user_phone: String,

    /// Twilio number to call from
    #[arg(long)]
    twilio_phone: String,

    /// Voice webhook URL (overrides TWILIO_WEBHOOK_URL)
    #[arg(long)]
    webhook_url: Option<String>,

    /// User id passed to the webhook as a query parameter
    #[arg(long)]
    user_id: Option<String>,
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
    let config = TwilioConfig::from_env()?;

    let mut webhook_url = cli.webhook_url.unwrap_or(config.webhook_url);
    if let Some(user_id) = &cli.user_id {
        webhook_url = append_query_param(&webhook_url, "user_id", user_id);
    }

    let service = TwilioService::new(TwilioOptions {
        account_sid: config.account_sid,
        auth_token: config.auth_token,
    });

    let call = service
        .create_call(&cli.user_phone, &cli.twilio_phone, &webhook_url)
        .await
        .context("Error initiating call")?;

    println!("{}", "✅ Call initiated successfully!".green().bold());
    println!("   Call SID: {}", call.sid);
    println!("   Status: {}", call.status);
    println!("   To: {}", call.to.as_deref().unwrap_or(&cli.user_phone));
    println!("   From: {}", call.from.as_deref().unwrap_or(&cli.twilio_phone));
    Ok(())
}
