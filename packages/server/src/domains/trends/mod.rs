//! Trending topics by location (WOEID).

use anyhow::Result;
use colored::Colorize;
use x_client::{TrendsResponse, XClient, XError};

pub const DEFAULT_MAX_TRENDS: u32 = 20;
pub const MAX_TRENDS_LIMIT: u32 = 50;
pub const TREND_FIELDS: &[&str] = &["trend_name", "tweet_count"];

/// Fetch trends for `woeid`. HTTP failures are logged with a hint and
/// returned; API-level `errors` come back inside the response.
pub async fn fetch_trends_by_woeid(
    client: &XClient,
    woeid: i64,
    max_trends: u32,
    fields: &[&str],
) -> Result<TrendsResponse> {
    if !(1..=MAX_TRENDS_LIMIT).contains(&max_trends) {
        anyhow::bail!("max_trends must be between 1 and {}", MAX_TRENDS_LIMIT);
    }
    if let Some(unknown) = fields.iter().find(|f| !TREND_FIELDS.contains(f)) {
        anyhow::bail!("Unknown trend field '{}'", unknown);
    }

    client
        .trends_by_woeid(woeid, max_trends, fields)
        .await
        .map_err(|e| {
            match &e {
                XError::Api { status: 404, .. } => {
                    tracing::error!(woeid, error = %e, "WOEID {} not found", woeid)
                }
                _ => match e.hint() {
                    Some(hint) => tracing::error!(woeid, error = %e, hint, "Trends request failed"),
                    None => tracing::error!(woeid, error = %e, "Trends request failed"),
                },
            }
            e.into()
        })
}

/// Plain-text table of the response, errors first.
pub fn render_trends(response: &TrendsResponse) -> String {
    let mut out = String::new();

    if !response.errors.is_empty() {
        out.push_str("Errors occurred:\n");
        for problem in &response.errors {
            out.push_str(&format!(
                "  - {}: {}\n",
                problem.title.as_deref().unwrap_or("Unknown error"),
                problem.detail.as_deref().unwrap_or("No details")
            ));
        }
        out.push('\n');
    }

    if response.data.is_empty() {
        out.push_str("No trends data found.\n");
        return out;
    }

    out.push_str(&format!("Found {} trending topics:\n\n", response.data.len()));
    out.push_str(&format!("{:<6} {:<50} {:<15}\n", "Rank", "Trend Name", "Tweet Count"));
    out.push_str(&format!("{}\n", "-".repeat(75)));
    for (idx, trend) in response.data.iter().enumerate() {
        let count = trend
            .tweet_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        out.push_str(&format!(
            "{:<6} {:<50} {:<15}\n",
            idx + 1,
            trend.trend_name.as_deref().unwrap_or("N/A"),
            count
        ));
    }
    out
}

pub fn print_trends(response: &TrendsResponse) {
    let table = render_trends(response);
    for line in table.lines() {
        if line.starts_with("Errors occurred") || line.starts_with("  - ") {
            println!("{}", line.red());
        } else if line.starts_with("Rank") {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
}
