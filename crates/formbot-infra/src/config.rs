//! Configuration loader for formbot.
//!
//! Reads `config.toml` from the data directory (`~/.formbot/` in production)
//! and deserializes it into [`BotConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use formbot_types::config::BotConfig;

/// Load configuration from `{data_dir}/config.toml` plus environment overrides.
///
/// Overrides: `PORT`, `FORMBOT_HOST`, `FORMBOT_FORMS_DIR`, `FORMBOT_LLM_MODEL`.
pub async fn load_config(data_dir: &Path) -> BotConfig {
    let config = load_config_file(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load `{data_dir}/config.toml` without looking at the environment.
///
/// - If the file does not exist, returns [`BotConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config_file(data_dir: &Path) -> BotConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return BotConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return BotConfig::default();
        }
    };

    match toml::from_str::<BotConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BotConfig::default()
        }
    }
}

/// Apply environment overrides read through `lookup`.
///
/// Blank values are ignored, as is a `PORT` that is not a valid port number.
pub fn apply_env_overrides(
    mut config: BotConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> BotConfig {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(port) = get("PORT") {
        match port.parse::<u16>() {
            Ok(port) => config.port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring invalid PORT"),
        }
    }
    if let Some(host) = get("FORMBOT_HOST") {
        config.host = host;
    }
    if let Some(dir) = get("FORMBOT_FORMS_DIR") {
        config.forms_dir = Some(PathBuf::from(dir));
    }
    if let Some(model) = get("FORMBOT_LLM_MODEL") {
        config.llm.model = model;
    }
    config
}

/// Directory holding form files: the configured one, or `{data_dir}/forms`.
pub fn forms_dir(config: &BotConfig, data_dir: &Path) -> PathBuf {
    config
        .forms_dir
        .clone()
        .unwrap_or_else(|| data_dir.join("forms"))
}
