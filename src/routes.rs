//! Inbound HTTP routes facing the dashboard.
//!
//! `GET /weather` serves the cached-or-fresh summary as JSON, errors are
//! plain-text bodies per the original contract. `POST /sendDailyUpdate` is
//! gated by a bearer shared secret and never touches the cache.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use forecast::ForecastService;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ForecastService>,
    pub daily_update_secret: String,
    pub location_name: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/weather", get(get_weather))
        .route("/sendDailyUpdate", post(send_daily_update))
        .with_state(state)
}

async fn liveness(State(state): State<AppState>) -> String {
    format!(
        "🌧️ {} Rain & Flood Forecast API is running.",
        state.location_name
    )
}

async fn get_weather(State(state): State<AppState>) -> Response {
    match state.service.get_forecast().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            error!("Error fetching weather data: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch weather data",
            )
                .into_response()
        }
    }
}

async fn send_daily_update(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if !bearer_matches(auth, &state.daily_update_secret) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    match state.service.send_daily_update().await {
        Ok(()) => (StatusCode::OK, "✅ Daily update sent to Telegram!").into_response(),
        Err(e) => {
            error!("Error sending daily update: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send daily update",
            )
                .into_response()
        }
    }
}

/// Constant shared-secret check. An empty configured secret never matches.
fn bearer_matches(header: Option<&str>, secret: &str) -> bool {
    match header {
        Some(value) => !secret.is_empty() && value == format!("Bearer {secret}"),
        None => false,
    }
}
