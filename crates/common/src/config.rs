//! Bot configuration types.

use serde::{Deserialize, Serialize};

/// Top-level floodwatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// OpenWeatherMap API key.
    #[serde(default)]
    pub weather_api_key: String,

    /// Telegram bot API token.
    #[serde(default)]
    pub telegram_api_token: String,

    /// Telegram chat / channel ID alerts are delivered to.
    #[serde(default)]
    pub telegram_chat_id: String,

    /// Shared secret protecting the daily-update endpoint.
    #[serde(default)]
    pub daily_update_secret: String,

    /// The single monitored coordinate.
    #[serde(default)]
    pub location: LocationConfig,

    /// Inbound HTTP server parameters.
    #[serde(default)]
    pub server: ServerConfig,
}

/// The fixed coordinate the service forecasts for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Human-readable name, used in messages.
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_lat")]
    pub lat: f64,
    #[serde(default = "default_lon")]
    pub lon: f64,
}

/// Inbound HTTP server parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listening port.
    #[serde(default = "default_port")]
    pub port: u16,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_location_name() -> String {
    "Lohan".into()
}

fn default_lat() -> f64 {
    5.969
}

fn default_lon() -> f64 {
    116.664
}

fn default_port() -> u16 {
    5000
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_location_name(),
            lat: default_lat(),
            lon: default_lon(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            weather_api_key: String::new(),
            telegram_api_token: String::new(),
            telegram_chat_id: String::new(),
            daily_update_secret: String::new(),
            location: LocationConfig::default(),
            server: ServerConfig::default(),
        }
    }
}
