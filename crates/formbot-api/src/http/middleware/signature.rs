//! Slack request signature check.
//!
//! Buffers the raw body, verifies `X-Slack-Signature` against it and hands
//! the same bytes on to the handler's extractor.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use secrecy::ExposeSecret;

use formbot_infra::slack::signature::{
    SIGNATURE_HEADER, SignatureError, TIMESTAMP_HEADER, verify_slack_signature,
};

use crate::http::error::AppError;
use crate::state::AppState;

/// Largest request body accepted on the Slack routes.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub async fn verify_slack_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::Validation(format!("failed to read request body: {e}")))?;

    if let Err(e) = check(&parts.headers, &bytes, state.signing_secret.expose_secret()) {
        tracing::warn!(path = %parts.uri.path(), error = %e, "rejected unsigned Slack request");
        return Err(AppError::Unauthorized(e.to_string()));
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn check(headers: &HeaderMap, body: &[u8], secret: &str) -> Result<(), SignatureError> {
    let header = |name: &'static str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .ok_or(SignatureError::MissingHeader(name))
    };
    let timestamp = header(TIMESTAMP_HEADER)?;
    let signature = header(SIGNATURE_HEADER)?;
    verify_slack_signature(
        secret.as_bytes(),
        timestamp,
        body,
        signature,
        chrono::Utc::now().timestamp(),
    )
}
