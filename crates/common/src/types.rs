//! Domain types shared across floodwatch.

use serde::{Deserialize, Serialize};

/// One 3-hour forecast bucket from the upstream provider.
///
/// `rain_mm` is the rainfall accumulated over the bucket; an absent rain
/// field upstream maps to 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    /// Civil date-time string as reported upstream (e.g. "2026-08-29 12:00:00").
    pub time: String,
    /// Rainfall over the 3-hour bucket, millimeters.
    pub rain_mm: f64,
}

/// Binary flood-risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Low,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Low => write!(f, "Low"),
        }
    }
}

/// Rainfall and risk for the immediate 6-hour window, plus capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Rainfall expected over the next 6 hours, millimeters.
    pub rain: f64,
    pub risk: RiskLevel,
    /// Human-readable capture time in the local (UTC+8) timezone.
    pub time: String,
}

/// Peak single-bucket rainfall across the 3-day scan window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDayOutlook {
    /// Maximum rainfall of any single 3-hour bucket, millimeters.
    pub max_rain: f64,
    pub level: RiskLevel,
}

/// One entry of the multi-day forecast projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: String,
    pub rain: f64,
}

/// The cached forecast artifact served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub current: CurrentConditions,
    pub risk_next_3_days: ThreeDayOutlook,
    /// Rainfall of the first 7 buckets, in forecast order.
    pub historical_rainfall: Vec<f64>,
    /// The first 24 buckets projected as {time, rain}.
    pub multi_day_forecast: Vec<ForecastPoint>,
    /// Up to 10 prior `current` snapshots, oldest first.
    pub past: Vec<CurrentConditions>,
    /// True once the high-risk alert has fired for the capture day.
    pub alert_sent: bool,
}
