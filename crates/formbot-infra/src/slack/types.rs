//! Slack Web API response shapes.
//!
//! Only the fields the client reads are modeled. Every response is first
//! checked for `ok: true` and then deserialized into one of these.

use serde::{Deserialize, Serialize};

use formbot_types::block::Block;

/// Body of `chat.postMessage`.
#[derive(Debug, Serialize)]
pub struct PostMessageRequest<'a> {
    pub channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "no_blocks")]
    pub blocks: &'a [Block],
}

/// Body POSTed to an interaction's `response_url`.
#[derive(Debug, Serialize)]
pub struct ResponseUrlRequest<'a> {
    pub response_type: &'a str,
    pub replace_original: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "no_blocks")]
    pub blocks: &'a [Block],
}

fn no_blocks(blocks: &&[Block]) -> bool {
    blocks.is_empty()
}

/// Body of `conversations.open`.
#[derive(Debug, Serialize)]
pub struct OpenConversationRequest<'a> {
    pub users: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

impl ResponseMetadata {
    /// Cursor for the next page, if there is one.
    pub fn next(&self) -> Option<&str> {
        Some(self.next_cursor.as_str()).filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct UserInfoResponse {
    pub user: UserObject,
}

#[derive(Debug, Deserialize)]
pub struct UserObject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub profile: UserProfileObject,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserProfileObject {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
}

impl UserObject {
    /// Best available human name: profile real name, real name, handle.
    pub fn display_name(&self) -> String {
        [self.profile.real_name.as_deref(), self.real_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|n| !n.is_empty())
            .unwrap_or(self.name.as_str())
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
pub struct ChannelObject {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationsListResponse {
    #[serde(default)]
    pub channels: Vec<ChannelObject>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
pub struct ConversationMembersResponse {
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
pub struct ConversationOpenResponse {
    pub channel: ChannelObject,
}
