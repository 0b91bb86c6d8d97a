//! HTTP delivery of form submissions to their submission URL.

use std::time::Duration;

use serde_json::Value;

use formbot_core::submission::SubmissionSink;
use formbot_types::error::ForwardError;

/// Default time allowed for a submission endpoint to answer.
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(30);

/// [`SubmissionSink`] that POSTs the payload as JSON with reqwest.
pub struct HttpSubmissionSink {
    client: reqwest::Client,
}

impl HttpSubmissionSink {
    pub fn new(timeout: Duration) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForwardError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl SubmissionSink for HttpSubmissionSink {
    async fn forward(&self, url: &str, payload: &Value) -> Result<(), ForwardError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ForwardError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::Status {
                status: status.as_u16(),
            });
        }
        tracing::debug!(%url, status = status.as_u16(), "submission forwarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::json;
    use tokio::net::TcpListener;

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn start_server(status: StatusCode) -> (SocketAddr, Received) {
        let received = Received::default();
        let app = Router::new()
            .route(
                "/hook",
                post(
                    move |State(received): State<Received>, axum::Json(body): axum::Json<Value>| async move {
                        received.lock().unwrap().push(body);
                        status
                    },
                ),
            )
            .with_state(received.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, received)
    }

    #[tokio::test]
    async fn test_forward_posts_json() {
        let (addr, received) = start_server(StatusCode::OK).await;
        let sink = HttpSubmissionSink::new(FORWARD_TIMEOUT).unwrap();
        let payload = json!({"full name": "Ana", "userSlackId": "U1", "userEmail": null});

        sink.forward(&format!("http://{addr}/hook"), &payload)
            .await
            .unwrap();

        assert_eq!(received.lock().unwrap().as_slice(), &[payload]);
    }

    #[tokio::test]
    async fn test_forward_reports_error_status() {
        let (addr, _received) = start_server(StatusCode::BAD_GATEWAY).await;
        let sink = HttpSubmissionSink::new(FORWARD_TIMEOUT).unwrap();

        let err = sink
            .forward(&format!("http://{addr}/hook"), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ForwardError::Status { status: 502 }));
    }

    #[tokio::test]
    async fn test_forward_unreachable_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = HttpSubmissionSink::new(Duration::from_secs(2)).unwrap();
        let err = sink
            .forward(&format!("http://{addr}/hook"), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ForwardError::Http(_)));
    }
}
