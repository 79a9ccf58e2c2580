use axum::{extract::Extension, Json};
use serde_json::{json, Value};

use super::ApiError;
use crate::domains::outreach::actions::{find_latest_report, read_report};
use crate::server::app::AppState;

/// Users from the newest outreach report in the reports directory.
pub async fn users_needing_support_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Value>, ApiError> {
    let dir = state.reports_dir.clone();
    let report = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        match find_latest_report(&dir)? {
            Some(path) => Ok(Some(read_report(&path)?)),
            None => Ok(None),
        }
    })
    .await
    .map_err(ApiError::internal)?
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to load outreach report");
        ApiError::internal(format!("{:#}", e))
    })?;

    let Some(report) = report else {
        return Ok(Json(json!({ "users": [] })));
    };

    Ok(Json(json!({
        "total_found": report.results.len(),
        "users": report.results,
        "scan_timestamp": report.scan_timestamp,
    })))
}
