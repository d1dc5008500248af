//! Configuration module - environment variable parsing

use std::env;

/// Keyboard alphabet accepted by the input matcher
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alphabet {
    Latin,
    Cyrillic,
    /// Both Latin and Cyrillic letters are accepted
    Mixed,
}

impl Alphabet {
    /// Parse from an environment value ("latin", "cyrillic", "mixed")
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "latin" => Some(Alphabet::Latin),
            "cyrillic" => Some(Alphabet::Cyrillic),
            "mixed" => Some(Alphabet::Mixed),
            _ => None,
        }
    }

    /// Whether a lowercase character belongs to this alphabet
    pub fn contains(&self, c: char) -> bool {
        let latin = c.is_ascii_lowercase();
        let cyrillic = ('а'..='я').contains(&c) || c == 'ё';
        match self {
            Alphabet::Latin => latin,
            Alphabet::Cyrillic => cyrillic,
            Alphabet::Mixed => latin || cyrillic,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the competition room API
    pub api_base_url: String,
    /// Opaque bearer credential supplied by the auth layer
    pub auth_token: String,
    /// Display name of the local player
    pub user_name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Alphabet accepted from the keyboard
    pub alphabet: Alphabet,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let alphabet = match env::var("ALPHABET") {
            Ok(value) => Alphabet::parse(&value).ok_or(ConfigError::InvalidAlphabet)?,
            Err(_) => Alphabet::Mixed,
        };

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map_err(|_| ConfigError::Missing("API_BASE_URL"))?,
            auth_token: env::var("AUTH_TOKEN").map_err(|_| ConfigError::Missing("AUTH_TOKEN"))?,
            user_name: env::var("USER_NAME").map_err(|_| ConfigError::Missing("USER_NAME"))?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            alphabet,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("ALPHABET must be one of: latin, cyrillic, mixed")]
    InvalidAlphabet,
}
