//! Floodwatch: flood-risk forecast and alerting service for one fixed
//! coordinate.
//!
//! Single-binary Tokio application that:
//! 1. Serves the dashboard's forecast summary over HTTP
//! 2. Fetches the OpenWeatherMap 3-hour forecast at most once per day
//! 3. Classifies rainfall aggregates into High/Low flood risk
//! 4. Pushes at most one high-risk Telegram alert per day
//! 5. Sends an on-demand daily Telegram report behind a shared secret

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use forecast::{ForecastService, SystemClock};
use openweather_client::OpenWeatherClient;
use routes::AppState;
use telegram_client::TelegramClient;

/// Rain & flood forecast service
#[derive(Parser)]
#[command(name = "floodwatch", about = "Rain & flood forecast service")]
struct Cli {
    /// Validate configuration and exit.
    #[arg(long)]
    check_config: bool,

    /// Send the daily Telegram update once and exit (no server).
    #[arg(long)]
    send_update: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "floodwatch=info,forecast=info,openweather_client=info,telegram_client=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("🌧️  Floodwatch starting up...");

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.check_config {
        info!(
            "✅ Configuration OK (location={} @ {},{}, port={})",
            cfg.location.name, cfg.location.lat, cfg.location.lon, cfg.server.port
        );
        return;
    }

    info!(
        "Location: {} ({}, {})",
        cfg.location.name, cfg.location.lat, cfg.location.lon
    );

    let provider = Arc::new(OpenWeatherClient::new(cfg.weather_api_key.clone()));
    let sink = Arc::new(TelegramClient::new(
        cfg.telegram_api_token.clone(),
        cfg.telegram_chat_id.clone(),
    ));
    let service = Arc::new(ForecastService::new(
        provider,
        sink,
        Arc::new(SystemClock::new()),
        cfg.location.clone(),
    ));

    // ── One-shot daily update mode ───────────────────────────────────
    if cli.send_update {
        info!("Sending one-shot daily update...");
        match service.send_daily_update().await {
            Ok(()) => info!("✅ Daily update sent"),
            Err(e) => {
                error!("❌ Daily update failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // ── Serve ────────────────────────────────────────────────────────
    let state = AppState {
        service,
        daily_update_secret: cfg.daily_update_secret.clone(),
        location_name: cfg.location.name.clone(),
    };
    let app = routes::router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("🚀 Floodwatch is listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("Server exited: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Floodwatch shut down.");
}
