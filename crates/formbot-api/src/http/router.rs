//! Axum router configuration with middleware.
//!
//! Slack routes live under `/slack/` behind signature verification.
//! `/health` is open. Every request is traced.

use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::middleware::signature::verify_slack_request;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let slack_routes = Router::new()
        .route("/commands", post(handlers::commands::slash_command))
        .route("/interactions", post(handlers::interactions::interaction))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            verify_slack_request,
        ));

    Router::new()
        .nest("/slack", slack_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use formbot_infra::secret::Credentials;
    use formbot_infra::slack::signature::{
        SIGNATURE_HEADER, TIMESTAMP_HEADER, compute_slack_signature,
    };
    use formbot_types::config::BotConfig;

    const SIGNING_SECRET: &str = "test-signing-secret";

    fn test_app(data_dir: &TempDir) -> Router {
        let mut config = BotConfig::default();
        // Nothing listens here; background replies fail and are only logged.
        config.slack.api_base_url = "http://127.0.0.1:9/api".to_string();

        let credentials = Credentials::from_lookup(|key| match key {
            "SLACK_BOT_TOKEN" => Some("xoxb-test".to_string()),
            "SLACK_SIGNING_SECRET" => Some(SIGNING_SECRET.to_string()),
            _ => None,
        })
        .unwrap();

        let state = AppState::init(&config, data_dir.path(), credentials).unwrap();
        build_router(state)
    }

    fn signed_post(uri: &str, body: &str, timestamp: i64) -> Request<Body> {
        let ts = timestamp.to_string();
        let signature =
            compute_slack_signature(SIGNING_SECRET.as_bytes(), &ts, body.as_bytes()).unwrap();
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(TIMESTAMP_HEADER, ts)
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const COMMAND_BODY: &str = "command=%2Flist-forms&text=&user_id=U1&user_name=ana\
        &channel_id=C1&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1";

    #[tokio::test]
    async fn health_check_returns_ok_with_version() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn signed_command_is_acknowledged() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(signed_post("/slack/commands", COMMAND_BODY, now()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unsigned_command_is_rejected() {
        let dir = TempDir::new().unwrap();
        let request = Request::post("/slack/commands")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(COMMAND_BODY))
            .unwrap();
        let response = test_app(&dir).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn tampered_body_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut request = signed_post("/slack/commands", COMMAND_BODY, now());
        *request.body_mut() = Body::from(COMMAND_BODY.replace("U1", "U2"));
        let response = test_app(&dir).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn stale_timestamp_is_rejected() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(signed_post("/slack/commands", COMMAND_BODY, now() - 600))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn interaction_of_other_type_is_acknowledged() {
        let dir = TempDir::new().unwrap();
        let body = "payload=%7B%22type%22%3A%22view_submission%22%7D";
        let response = test_app(&dir)
            .oneshot(signed_post("/slack/interactions", body, now()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn interaction_with_malformed_payload_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(signed_post("/slack/interactions", "payload=not-json", now()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");
    }
}
