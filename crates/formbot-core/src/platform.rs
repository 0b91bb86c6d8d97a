//! ChatPlatform trait: the outbound half of the Slack integration.
//!
//! Inbound events arrive through the HTTP layer; everything the bot says or
//! looks up goes through this port. The Web API client in formbot-infra
//! implements it.

use formbot_types::block::SlackMessage;
use formbot_types::error::PlatformError;
use formbot_types::slack::{Channel, UserProfile};

/// Outbound chat platform operations.
pub trait ChatPlatform: Send + Sync {
    /// Post a message to a channel (or DM channel).
    fn post_message(
        &self,
        channel: &str,
        message: &SlackMessage,
    ) -> impl std::future::Future<Output = Result<(), PlatformError>> + Send;

    /// Reply through an interaction's `response_url` without replacing the
    /// original message.
    fn respond(
        &self,
        response_url: &str,
        message: &SlackMessage,
        ephemeral: bool,
    ) -> impl std::future::Future<Output = Result<(), PlatformError>> + Send;

    /// Look up a member's profile.
    fn user_profile(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile, PlatformError>> + Send;

    /// List public and private channels visible to the bot.
    fn list_channels(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Channel>, PlatformError>> + Send;

    /// List member ids of a channel.
    fn channel_members(
        &self,
        channel: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, PlatformError>> + Send;

    /// Open (or reuse) a direct message channel with a member and return its id.
    fn open_dm(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<String, PlatformError>> + Send;
}
