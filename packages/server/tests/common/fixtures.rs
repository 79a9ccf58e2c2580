use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use support_core::common::{Post, PostMetrics};
use support_core::kernel::test_dependencies::{MockAI, TestDependencies};
use support_core::server::{build_app, AppState};
use tower::ServiceExt;

pub fn post(id: &str, author_id: &str, username: &str, text: &str) -> Post {
    Post {
        id: id.to_string(),
        text: text.to_string(),
        author_id: Some(author_id.to_string()),
        username: username.to_string(),
        name: username.to_string(),
        created_at: Some("2025-01-01T00:00:00.000Z".to_string()),
        metrics: PostMetrics::default(),
    }
}

pub const DISTRESSED_VERDICT: &str = r#"```json
{"is_negative": true, "sentiment": "negative", "severity": "high",
 "concerns": ["isolation", "exhaustion"], "needs_support": true,
 "reasoning": "describes feeling alone and worn out"}
```"#;

pub const NEUTRAL_VERDICT: &str = r#"{"is_negative": false, "sentiment": "neutral",
 "severity": "low", "concerns": [], "needs_support": false, "reasoning": "weather chat"}"#;

pub fn test_state(ai: MockAI, reports_dir: &Path) -> AppState {
    let deps = TestDependencies::with_ai(ai).into_server_deps();
    AppState::new(deps, reports_dir.to_path_buf())
}

pub fn test_app(ai: MockAI, reports_dir: &Path) -> Router {
    build_app(test_state(ai, reports_dir))
}

/// Send a request through the router and decode the JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
