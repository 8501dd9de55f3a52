mod defaults;


use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::TempoError;
use defaults::*;

/// Top-level Tempo configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tempo: TempoConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub timer: TimerConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempoConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub telegram: Option<TelegramConfig>,
}

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    /// Sender ids allowed to start countdowns. Messages from anyone else
    /// are dropped without side effects.
    #[serde(default)]
    pub allowed_users: Vec<i64>,
    /// Chat where countdown messages are posted and pinned.
    #[serde(default)]
    pub group_chat_id: i64,
}

/// Provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider")]
    pub default: String,
    pub openai: Option<OpenAiConfig>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default: default_provider(),
            openai: Some(OpenAiConfig::default()),
        }
    }
}

/// OpenAI-compatible completion endpoint config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_openai_base_url(),
            model: default_openai_model(),
        }
    }
}

/// Countdown trigger config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Keyword whose whole-word, case-insensitive presence activates the
    /// countdown flow.
    #[serde(default = "default_trigger_word")]
    pub trigger_word: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            trigger_word: default_trigger_word(),
        }
    }
}

impl Config {
    /// Verify that everything required to run is present.
    ///
    /// Secrets may arrive via environment (`load` applies the overrides
    /// before this runs). A missing AI key is only a warning: the intent
    /// resolver degrades to its defaults when the completion call fails.
    pub fn validate(&self) -> Result<(), TempoError> {
        let tg = self
            .channel
            .telegram
            .as_ref()
            .filter(|tg| tg.enabled)
            .ok_or_else(|| {
                TempoError::Config("telegram channel is not enabled in config".into())
            })?;

        if tg.bot_token.is_empty() {
            return Err(TempoError::Config(
                "telegram bot_token is empty. Set it in config.toml or TELEGRAM_BOT_TOKEN env var."
                    .into(),
            ));
        }
        if tg.group_chat_id == 0 {
            return Err(TempoError::Config(
                "telegram group_chat_id is not set — countdowns need a target chat".into(),
            ));
        }
        if tg.allowed_users.is_empty() {
            return Err(TempoError::Config(
                "telegram allowed_users is empty — nobody would be able to start a countdown"
                    .into(),
            ));
        }
        if self.timer.trigger_word.trim().is_empty() {
            return Err(TempoError::Config("timer trigger_word is empty".into()));
        }

        match &self.provider.openai {
            Some(ai) if ai.api_key.is_empty() => {
                warn!("AI api_key is empty — every request will fall back to the default timer");
            }
            Some(_) => {}
            None => {
                return Err(TempoError::Config(
                    "provider.openai section is missing".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Fill secrets from the environment when the config file left them empty.
fn apply_env_overrides(config: &mut Config) {
    if let Some(ref mut tg) = config.channel.telegram {
        if tg.bot_token.is_empty() {
            if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
                tg.bot_token = token;
            }
        }
    }
    if let Some(ref mut ai) = config.provider.openai {
        if ai.api_key.is_empty() {
            if let Ok(key) = std::env::var("AI_API_KEY") {
                ai.api_key = key;
            }
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist (the result will not
/// pass `validate()` until tokens and ids are provided some other way).
pub fn load(path: &str) -> Result<Config, TempoError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TempoError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| TempoError::Config(format!("failed to parse config: {e}")))?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_env_overrides(&mut config);
    Ok(config)
}
