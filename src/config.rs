use std::env;

use crate::error::ConfigError;

/// Immutable runtime configuration, collected once at startup.
///
/// Inner components never read the process environment themselves; everything
/// they need arrives through this struct.
#[derive(Debug, Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any name→value lookup. Tests pass a map instead of the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError(name))
        };

        Ok(Self {
            practicum_token: require("PRACTICUM_TOKEN")?,
            telegram_token: require("TELEGRAM_TOKEN")?,
            telegram_chat_id: require("TELEGRAM_CHAT_ID")?,
        })
    }
}
