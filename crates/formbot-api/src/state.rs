//! Application state wiring the Slack endpoints to `FormBot`.
//!
//! `FormBot` is generic over its ports; AppState pins it to the concrete
//! infra implementations.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use formbot_core::service::form_bot::FormBot;
use formbot_infra::config::forms_dir;
use formbot_infra::filesystem::JsonFormRepository;
use formbot_infra::forward::{FORWARD_TIMEOUT, HttpSubmissionSink};
use formbot_infra::llm::anthropic::AnthropicProvider;
use formbot_infra::secret::Credentials;
use formbot_infra::slack::SlackWebClient;
use formbot_types::config::BotConfig;

const SLACK_TIMEOUT: Duration = Duration::from_secs(10);
const LLM_TIMEOUT: Duration = Duration::from_secs(60);

/// Concrete `FormBot` pinned to infra implementations.
pub type ConcreteFormBot =
    FormBot<JsonFormRepository, SlackWebClient, HttpSubmissionSink, AnthropicProvider>;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<ConcreteFormBot>,
    /// Secret used to verify `X-Slack-Signature`.
    pub signing_secret: Arc<SecretString>,
}

impl AppState {
    /// Build the clients and wire them into a `FormBot`.
    pub fn init(config: &BotConfig, data_dir: &Path, credentials: Credentials) -> anyhow::Result<Self> {
        let forms = JsonFormRepository::new(forms_dir(config, data_dir));
        let platform = SlackWebClient::new(
            credentials.slack_bot_token,
            config.slack.api_base_url.as_str(),
            SLACK_TIMEOUT,
        )?;
        let sink = HttpSubmissionSink::new(FORWARD_TIMEOUT)?;

        let llm = match credentials.anthropic_api_key {
            Some(key) => Some(AnthropicProvider::new(key, LLM_TIMEOUT)?),
            None => {
                tracing::info!("ANTHROPIC_API_KEY not set; broadcasts use the template invitation");
                None
            }
        };

        let bot = FormBot::new(forms, platform, sink, llm, config.llm.clone());
        Ok(Self {
            bot: Arc::new(bot),
            signing_secret: Arc::new(credentials.slack_signing_secret),
        })
    }
}
