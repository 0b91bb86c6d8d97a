//! Invitation text for channel broadcasts.
//!
//! `generate_invitation` asks the LLM for a short, upbeat message inviting a
//! member to fill in a form. `invitation_or_fallback` wraps it so a broadcast
//! always has something to send.

use formbot_types::config::LlmSettings;
use formbot_types::form::Form;
use formbot_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use crate::llm::provider::LlmProvider;

const INVITATION_SYSTEM_PROMPT: &str = "You write short, fun Slack messages that invite \
colleagues to fill out a form. The message must be engaging and motivate the reader to \
complete the form. Return ONLY the message, without quotes or any other text.";

/// Ask the LLM for an invitation to fill in `form`.
///
/// The reply is trimmed of whitespace and surrounding quotes. An empty reply
/// is reported as `LlmError::EmptyCompletion`.
#[tracing::instrument(
    name = "gen_ai.invitation",
    skip(provider, form),
    fields(
        gen_ai.system = provider.name(),
        gen_ai.request.model = %model,
        gen_ai.request.max_tokens = max_tokens,
        form_id = %form.id,
    )
)]
pub async fn generate_invitation<L: LlmProvider>(
    provider: &L,
    model: &str,
    max_tokens: u32,
    form: &Form,
) -> Result<String, LlmError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message {
            role: MessageRole::User,
            content: format!(
                "Write a short, fun message inviting someone to fill out a form titled \"{}\" \
                 with the description \"{}\".",
                form.title, form.description
            ),
        }],
        system: Some(INVITATION_SYSTEM_PROMPT.to_string()),
        max_tokens,
        temperature: None,
    };

    let response = provider.complete(&request).await?;
    let text = clean_reply(&response.content);
    if text.is_empty() {
        return Err(LlmError::EmptyCompletion);
    }

    tracing::debug!(
        gen_ai.usage.input_tokens = response.usage.input_tokens,
        gen_ai.usage.output_tokens = response.usage.output_tokens,
        "generated invitation"
    );
    Ok(text)
}

/// Template invitation used when no LLM text is available.
pub fn fallback_invitation(form: &Form) -> String {
    format!(
        "You're invited to fill out *{}*: {}",
        form.title, form.description
    )
}

/// LLM invitation when a provider is configured and answers, the template otherwise.
pub async fn invitation_or_fallback<L: LlmProvider>(
    provider: Option<&L>,
    settings: &LlmSettings,
    form: &Form,
) -> String {
    let Some(provider) = provider.filter(|_| settings.enabled) else {
        return fallback_invitation(form);
    };

    match generate_invitation(provider, &settings.model, settings.max_tokens, form).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, form_id = %form.id, "invitation generation failed, using template");
            fallback_invitation(form)
        }
    }
}

fn clean_reply(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string()
}
