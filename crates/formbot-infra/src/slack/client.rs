//! SlackWebClient: concrete [`ChatPlatform`] over the Slack Web API.
//!
//! Every call authenticates with the bot token as a bearer token. Responses
//! are JSON envelopes with an `ok` flag; `ok: false` becomes
//! `PlatformError::Api` carrying Slack's error code. List endpoints are
//! cursor-paginated and fully drained.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;

use formbot_core::platform::ChatPlatform;
use formbot_types::block::SlackMessage;
use formbot_types::error::PlatformError;
use formbot_types::slack::{Channel, UserProfile};

use super::types::{
    ConversationMembersResponse, ConversationOpenResponse, ConversationsListResponse,
    OpenConversationRequest, PostMessageRequest, ResponseUrlRequest, UserInfoResponse,
};

/// Page size requested from list endpoints.
const PAGE_LIMIT: &str = "200";

/// Upper bound on pages fetched from one list endpoint.
const MAX_PAGES: usize = 500;

/// Cursor for the page after `page`, or `None` when pagination should stop.
///
/// Stops on an empty cursor, on a cursor equal to the one just used, and
/// after `MAX_PAGES` pages.
fn advance_cursor(
    method: &str,
    current: Option<&str>,
    next: Option<&str>,
    page: usize,
) -> Option<String> {
    let next = next?;
    if current == Some(next) {
        tracing::warn!(method, cursor = next, "slack returned the same cursor twice");
        return None;
    }
    if page >= MAX_PAGES {
        tracing::warn!(method, pages = page, "pagination stopped at page limit");
        return None;
    }
    Some(next.to_string())
}

/// Slack Web API client.
pub struct SlackWebClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl SlackWebClient {
    /// Create a client for the Web API at `base_url` (normally `https://slack.com/api`).
    pub fn new(
        token: SecretString,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlatformError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PlatformError> {
        let response = self
            .client
            .get(self.url(method))
            .bearer_auth(self.token.expose_secret())
            .query(query)
            .send()
            .await
            .map_err(|e| PlatformError::Http(e.to_string()))?;
        parse_envelope(method, response).await
    }

    async fn post<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, PlatformError> {
        let response = self
            .client
            .post(self.url(method))
            .bearer_auth(self.token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| PlatformError::Http(e.to_string()))?;
        parse_envelope(method, response).await
    }
}

/// Check the `ok` flag of a Web API response and decode its payload.
async fn parse_envelope<T: DeserializeOwned>(
    method: &str,
    response: reqwest::Response,
) -> Result<T, PlatformError> {
    let status = response.status();
    let body: Value = response.json().await.map_err(|e| {
        PlatformError::Deserialization(format!("{method} returned HTTP {status}: {e}"))
    })?;

    if body.get("ok").and_then(Value::as_bool) != Some(true) {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error")
            .to_string();
        tracing::debug!(method, error = %code, "slack api call failed");
        return Err(PlatformError::Api(code));
    }

    serde_json::from_value(body)
        .map_err(|e| PlatformError::Deserialization(format!("{method}: {e}")))
}

impl ChatPlatform for SlackWebClient {
    async fn post_message(&self, channel: &str, message: &SlackMessage) -> Result<(), PlatformError> {
        let body = PostMessageRequest {
            channel,
            text: message.text.as_deref(),
            blocks: &message.blocks,
        };
        self.post::<_, Value>("chat.postMessage", &body).await?;
        Ok(())
    }

    async fn respond(
        &self,
        response_url: &str,
        message: &SlackMessage,
        ephemeral: bool,
    ) -> Result<(), PlatformError> {
        let body = ResponseUrlRequest {
            response_type: if ephemeral { "ephemeral" } else { "in_channel" },
            replace_original: false,
            text: message.text.as_deref(),
            blocks: &message.blocks,
        };
        // response_url answers with a plain "ok" body, not a JSON envelope.
        let response = self
            .client
            .post(response_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api(format!(
                "response_url returned HTTP {status}: {text}"
            )));
        }
        Ok(())
    }

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, PlatformError> {
        let info: UserInfoResponse = self.get("users.info", &[("user", user_id)]).await?;
        Ok(UserProfile {
            name: info.user.display_name(),
            id: info.user.id,
            email: info.user.profile.email.filter(|e| !e.is_empty()),
        })
    }

    async fn list_channels(&self) -> Result<Vec<Channel>, PlatformError> {
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;
        loop {
            let page: ConversationsListResponse = {
                let mut query = vec![
                    ("types", "public_channel,private_channel"),
                    ("exclude_archived", "true"),
                    ("limit", PAGE_LIMIT),
                ];
                if let Some(c) = cursor.as_deref() {
                    query.push(("cursor", c));
                }
                self.get("conversations.list", &query).await?
            };
            channels.extend(page.channels.into_iter().map(|c| Channel {
                id: c.id,
                name: c.name,
            }));
            pages += 1;
            cursor = advance_cursor(
                "conversations.list",
                cursor.as_deref(),
                page.response_metadata.next(),
                pages,
            );
            if cursor.is_none() {
                break;
            }
        }
        tracing::debug!(count = channels.len(), "listed channels");
        Ok(channels)
    }

    async fn channel_members(&self, channel: &str) -> Result<Vec<String>, PlatformError> {
        let mut members = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;
        loop {
            let page: ConversationMembersResponse = {
                let mut query = vec![("channel", channel), ("limit", PAGE_LIMIT)];
                if let Some(c) = cursor.as_deref() {
                    query.push(("cursor", c));
                }
                self.get("conversations.members", &query).await?
            };
            members.extend(page.members);
            pages += 1;
            cursor = advance_cursor(
                "conversations.members",
                cursor.as_deref(),
                page.response_metadata.next(),
                pages,
            );
            if cursor.is_none() {
                break;
            }
        }
        Ok(members)
    }

    async fn open_dm(&self, user_id: &str) -> Result<String, PlatformError> {
        let opened: ConversationOpenResponse = self
            .post("conversations.open", &OpenConversationRequest { users: user_id })
            .await?;
        Ok(opened.channel.id)
    }
}
