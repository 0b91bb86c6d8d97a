//! Credentials read from the environment.
//!
//! The Slack bot token and signing secret are required; the Anthropic key is
//! optional (without it, broadcasts use the template invitation). Values are
//! wrapped in [`SecretString`] as soon as they are read.

use secrecy::SecretString;

pub const SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
pub const SLACK_SIGNING_SECRET: &str = "SLACK_SIGNING_SECRET";
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

/// Errors resolving credentials.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Secrets the server needs to talk to Slack and Anthropic.
pub struct Credentials {
    pub slack_bot_token: SecretString,
    pub slack_signing_secret: SecretString,
    pub anthropic_api_key: Option<SecretString>,
}

impl Credentials {
    /// Read credentials from process environment variables.
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through `lookup`. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CredentialsError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| {
            get(key)
                .map(SecretString::from)
                .ok_or(CredentialsError::Missing(key))
        };

        Ok(Self {
            slack_bot_token: require(SLACK_BOT_TOKEN)?,
            slack_signing_secret: require(SLACK_SIGNING_SECRET)?,
            anthropic_api_key: get(ANTHROPIC_API_KEY).map(SecretString::from),
        })
    }
}
