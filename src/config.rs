//! Configuration loader: merges env vars, .env file, and config.toml.

use common::{BotConfig, Error};
use std::path::Path;

fn parse_f64(raw: &str, env_name: &str) -> Result<f64, Error> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{env_name} must be a number")))
}

fn parse_port(raw: &str) -> Result<u16, Error> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| Error::Config("PORT must be an integer in 1..=65535".into()))
}

fn validate_config(config: &BotConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.weather_api_key.is_empty() {
        issues.push("WEATHER_API is required (set in .env or environment)".into());
    }
    if config.telegram_api_token.is_empty() {
        issues.push("TELEGRAM_API_TOKEN is required (set in .env or environment)".into());
    }
    if config.telegram_chat_id.is_empty() {
        issues.push("TELEGRAM_CHAT_ID is required (set in .env or environment)".into());
    }
    if config.daily_update_secret.is_empty() {
        issues.push("DAILY_UPDATE_SECRET is required (set in .env or environment)".into());
    }

    if config.location.name.trim().is_empty() {
        issues.push("location.name must not be empty".into());
    }
    if !(-90.0..=90.0).contains(&config.location.lat) {
        issues.push("location.lat must be in [-90, 90]".into());
    }
    if !(-180.0..=180.0).contains(&config.location.lon) {
        issues.push("location.lon must be in [-180, 180]".into());
    }

    if config.server.port == 0 {
        issues.push("server.port must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load service configuration from environment and optional config file.
pub fn load_config() -> Result<BotConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = BotConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(key) = std::env::var("WEATHER_API") {
        config.weather_api_key = key;
    }
    if let Ok(token) = std::env::var("TELEGRAM_API_TOKEN") {
        config.telegram_api_token = token;
    }
    if let Ok(chat_id) = std::env::var("TELEGRAM_CHAT_ID") {
        config.telegram_chat_id = chat_id;
    }
    if let Ok(secret) = std::env::var("DAILY_UPDATE_SECRET") {
        config.daily_update_secret = secret;
    }
    if let Ok(name) = std::env::var("LOCATION_NAME") {
        config.location.name = name;
    }
    if let Ok(lat) = std::env::var("LOCATION_LAT") {
        config.location.lat = parse_f64(&lat, "LOCATION_LAT")?;
    }
    if let Ok(lon) = std::env::var("LOCATION_LON") {
        config.location.lon = parse_f64(&lon, "LOCATION_LON")?;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.server.port = parse_port(&port)?;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}
