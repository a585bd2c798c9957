//! Client configuration
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Serialize;
use std::env;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bot token; `login` may supply one instead
    pub token: Option<String>,
    /// Raw gateway intents bitmask sent with identify
    pub intents: u64,
    pub gateway_url: String,
    pub api_url: String,
    pub cdn_url: String,
    /// Fixed delay between reconnection attempts
    pub reconnect_delay_ms: u64,
    /// Force a reconnect when a heartbeat goes unacknowledged
    pub detect_zombie_connections: bool,
    pub properties: ConnectionProperties,
    pub user_agent: String,
    pub env: Environment,
}

/// Connection properties reported in the identify payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionProperties {
    pub os: String,
    pub browser: String,
    pub device: String,
}

impl Default for ConnectionProperties {
    fn default() -> Self {
        Self {
            os: default_os(),
            browser: default_browser(),
            device: default_device(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

// Default value functions
fn default_intents() -> u64 {
    3_276_799
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_api_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_cdn_url() -> String {
    "https://cdn.discordapp.com".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    5000
}

fn default_os() -> String {
    "linux".to_string()
}

fn default_browser() -> String {
    "chord".to_string()
}

fn default_device() -> String {
    "chord".to_string()
}

fn default_user_agent() -> String {
    format!(
        "DiscordBot (https://github.com/chord-rs/chord, {})",
        env!("CARGO_PKG_VERSION")
    )
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: None,
            intents: default_intents(),
            gateway_url: default_gateway_url(),
            api_url: default_api_url(),
            cdn_url: default_cdn_url(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            detect_zombie_connections: false,
            properties: ConnectionProperties::default(),
            user_agent: default_user_agent(),
            env: Environment::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = match lookup("APP_ENV") {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
            None => Environment::default(),
        };

        let reconnect_delay_ms = match parse_var(&lookup, "RECONNECT_DELAY_MS")? {
            Some(0) => {
                let raw = lookup("RECONNECT_DELAY_MS").unwrap_or_default();
                return Err(ConfigError::InvalidValue("RECONNECT_DELAY_MS", raw));
            }
            Some(ms) => ms,
            None => default_reconnect_delay_ms(),
        };

        Ok(Self {
            token: lookup("DISCORD_TOKEN").filter(|t| !t.trim().is_empty()),
            intents: parse_var(&lookup, "DISCORD_INTENTS")?.unwrap_or_else(default_intents),
            gateway_url: lookup("GATEWAY_URL").unwrap_or_else(default_gateway_url),
            api_url: lookup("API_URL").unwrap_or_else(default_api_url),
            cdn_url: lookup("CDN_URL").unwrap_or_else(default_cdn_url),
            reconnect_delay_ms,
            detect_zombie_connections: parse_var(&lookup, "ZOMBIE_DETECTION")?.unwrap_or(false),
            properties: ConnectionProperties {
                os: lookup("IDENTIFY_OS").unwrap_or_else(default_os),
                browser: lookup("IDENTIFY_BROWSER").unwrap_or_else(default_browser),
                device: lookup("IDENTIFY_DEVICE").unwrap_or_else(default_device),
            },
            user_agent: lookup("USER_AGENT").unwrap_or_else(default_user_agent),
            env,
        })
    }

    /// Set the token used by `login` when none is passed explicitly
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_intents(mut self, intents: u64) -> Self {
        self.intents = intents;
        self
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw))
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
