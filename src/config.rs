use std::fmt;
use std::net::SocketAddr;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is not set or empty.
    MissingVar { name: &'static str },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar { name } => {
                write!(f, "environment variable {name} is not set")
            }
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const WEATHER_TOKEN_VAR: &str = "WEATHER_TOKEN";
pub const SPEECH_TOKEN_VAR: &str = "SPEECHKIT_TOKEN";
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration, read once at startup and passed into every
/// client constructor.
#[derive(Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    /// OpenWeatherMap API key.
    pub weather_api_key: String,
    /// SpeechKit IAM token.
    pub speech_api_token: String,
    /// Address the webhook server listens on.
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; tests pass closures over maps.
    pub fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_bot_token = require(&get, TELEGRAM_TOKEN_VAR)?;
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = telegram_bot_token.split(':').collect();
        if token_parts.len() != 2
            || token_parts[0].parse::<u64>().is_err()
            || token_parts[1].is_empty()
        {
            return Err(ConfigError::Validation(format!(
                "{TELEGRAM_TOKEN_VAR} appears invalid (expected format: 123456789:ABCdefGHI...)"
            )));
        }

        let weather_api_key = require(&get, WEATHER_TOKEN_VAR)?;
        let speech_api_token = require(&get, SPEECH_TOKEN_VAR)?;

        let bind_addr = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|e| {
            ConfigError::Validation(format!(
                "{BIND_ADDR_VAR} '{bind_addr}' is not a socket address: {e}"
            ))
        })?;

        Ok(Self {
            telegram_bot_token,
            weather_api_key,
            speech_api_token,
            bind_addr,
        })
    }
}

fn require<F>(get: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar { name }),
    }
}
