//! Unified error type for floodwatch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Upstream forecast error: {0}")]
    Upstream(String),

    #[error("Notification send error: {0}")]
    Notification(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
