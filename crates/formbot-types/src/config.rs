//! Configuration types for formbot.
//!
//! `BotConfig` is the top-level `config.toml` found in the data directory.
//! Secrets (Slack token, signing secret, Anthropic key) are never part of it;
//! they come from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `form_*.json` files. Defaults to `{data_dir}/forms`.
    #[serde(default)]
    pub forms_dir: Option<PathBuf>,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub slack: SlackSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            forms_dir: None,
            llm: LlmSettings::default(),
            slack: SlackSettings::default(),
        }
    }
}

/// Settings for invitation message generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Set to false to always use the template invitation.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_model() -> String {
    "claude-3-5-sonnet-20240620".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Slack Web API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackSettings {
    /// Base URL of the Web API (overridable for tests and proxies).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_config_default_values() {
        let config = BotConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.forms_dir.is_none());
        assert_eq!(config.llm.model, "claude-3-5-sonnet-20240620");
        assert_eq!(config.llm.max_tokens, 1024);
        assert!(config.llm.enabled);
        assert_eq!(config.slack.api_base_url, "https://slack.com/api");
    }

    #[test]
    fn test_bot_config_deserialize_empty() {
        let config: BotConfig = toml::from_str("").unwrap();
        assert_eq!(config, BotConfig::default());
    }

    #[test]
    fn test_bot_config_deserialize_with_values() {
        let toml_str = r#"
port = 8080
forms_dir = "/var/lib/formbot/forms"

[llm]
enabled = false
model = "claude-3-5-haiku-20241022"

[slack]
api_base_url = "http://localhost:9999/api"
"#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(
            config.forms_dir,
            Some(PathBuf::from("/var/lib/formbot/forms"))
        );
        assert!(!config.llm.enabled);
        assert_eq!(config.llm.model, "claude-3-5-haiku-20241022");
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.slack.api_base_url, "http://localhost:9999/api");
    }
}
