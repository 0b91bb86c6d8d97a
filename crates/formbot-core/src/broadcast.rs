//! Delivering a form to every member of a channel by direct message.

use formbot_types::block::SlackMessage;
use formbot_types::error::PlatformError;
use formbot_types::form::Form;

use crate::platform::ChatPlatform;
use crate::prompts;

/// Outcome of delivering a form to a channel's members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastStats {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<DeliveryFailure>,
}

/// A member the form could not be delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub user_id: String,
    /// Looked up after the failure; `None` if that lookup failed too.
    pub email: Option<String>,
    pub reason: String,
}

/// DM `invitation` followed by the rendered form to each member.
///
/// Members are processed one at a time. A failure for one member is recorded
/// and delivery continues with the next.
#[tracing::instrument(
    name = "deliver_form",
    skip(platform, form, members, invitation),
    fields(form_id = %form.id, members = members.len())
)]
pub async fn deliver_form<P: ChatPlatform>(
    platform: &P,
    form: &Form,
    members: &[String],
    invitation: &str,
) -> BroadcastStats {
    let rendered = prompts::render_form(form);
    let mut stats = BroadcastStats::default();

    for member in members {
        match deliver_to_member(platform, member, invitation, &rendered).await {
            Ok(()) => stats.succeeded += 1,
            Err(e) => {
                tracing::warn!(user_id = %member, error = %e, "form delivery failed");
                let email = platform
                    .user_profile(member)
                    .await
                    .ok()
                    .and_then(|profile| profile.email);
                stats.failed += 1;
                stats.failures.push(DeliveryFailure {
                    user_id: member.clone(),
                    email,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        "form delivered to channel"
    );
    stats
}

async fn deliver_to_member<P: ChatPlatform>(
    platform: &P,
    member: &str,
    invitation: &str,
    rendered: &SlackMessage,
) -> Result<(), PlatformError> {
    let dm = platform.open_dm(member).await?;
    let greeting = SlackMessage::text(format!("<@{member}> {invitation}"));
    platform.post_message(&dm, &greeting).await?;
    platform.post_message(&dm, rendered).await
}
