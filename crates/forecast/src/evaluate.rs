//! Rainfall aggregation and risk classification.
//!
//! Pure functions over the ordered 3-hour sample list. Risk is classified
//! on the raw aggregate (strict greater-than); displayed figures are
//! rounded to one decimal afterwards so rounding can never flip a level.

use chrono::{DateTime, FixedOffset};
use common::{
    CurrentConditions, ForecastPoint, ForecastSample, ForecastSummary, RiskLevel, ThreeDayOutlook,
};

/// High-risk threshold for single-day aggregates and the peak bucket, mm.
pub const RISK_THRESHOLD_MM: f64 = 20.0;
/// High-risk threshold for the 3-day aggregate outlook total, mm.
pub const OUTLOOK_THRESHOLD_MM: f64 = 30.0;

/// 3-hour buckets covering the next 6 hours.
pub const SAMPLES_6H: usize = 2;
/// 3-hour buckets covering one day.
pub const SAMPLES_PER_DAY: usize = 8;
/// 3-hour buckets covering the 3-day scan window.
pub const SAMPLES_3_DAYS: usize = 24;
/// Buckets kept for the rainfall chart.
pub const HISTORY_LEN: usize = 7;
/// Bound on retained prior `current` snapshots.
pub const PAST_CAPACITY: usize = 10;

/// Round to one decimal place for the wire.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Sum rainfall over `samples[start..end)`, tolerating short lists.
pub fn rain_total(samples: &[ForecastSample], start: usize, end: usize) -> f64 {
    samples
        .iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .map(|s| s.rain_mm)
        .sum()
}

/// Peak single-bucket rainfall over `samples[0..n)`.
pub fn peak_rain(samples: &[ForecastSample], n: usize) -> f64 {
    samples
        .iter()
        .take(n)
        .map(|s| s.rain_mm)
        .fold(0.0, f64::max)
}

/// Classify a single-day aggregate or peak bucket. Strict greater-than.
pub fn risk_for(total_mm: f64) -> RiskLevel {
    if total_mm > RISK_THRESHOLD_MM {
        RiskLevel::High
    } else {
        RiskLevel::Low
    }
}

/// Capture-time string in the local timezone.
pub fn format_capture_time(now: DateTime<FixedOffset>) -> String {
    now.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Build a fresh summary from the ordered sample list.
///
/// `prev` is the previously cached summary (if any); its `current` snapshot
/// is appended to its `past` sequence, bounded to the last
/// [`PAST_CAPACITY`] entries with the oldest dropped first.
pub fn build_summary(
    samples: &[ForecastSample],
    now: DateTime<FixedOffset>,
    prev: Option<ForecastSummary>,
) -> ForecastSummary {
    let rain_6h = rain_total(samples, 0, SAMPLES_6H);
    let current = CurrentConditions {
        rain: round1(rain_6h),
        risk: risk_for(rain_6h),
        time: format_capture_time(now),
    };

    let max_rain = peak_rain(samples, SAMPLES_3_DAYS);
    let risk_next_3_days = ThreeDayOutlook {
        max_rain: round1(max_rain),
        level: risk_for(max_rain),
    };

    let multi_day_forecast = samples
        .iter()
        .take(SAMPLES_3_DAYS)
        .map(|s| ForecastPoint {
            time: s.time.clone(),
            rain: round1(s.rain_mm),
        })
        .collect();

    let historical_rainfall = samples
        .iter()
        .take(HISTORY_LEN)
        .map(|s| round1(s.rain_mm))
        .collect();

    let past = match prev {
        Some(prev) => {
            let mut past = prev.past;
            past.push(prev.current);
            if past.len() > PAST_CAPACITY {
                let excess = past.len() - PAST_CAPACITY;
                past.drain(..excess);
            }
            past
        }
        None => Vec::new(),
    };

    ForecastSummary {
        current,
        risk_next_3_days,
        historical_rainfall,
        multi_day_forecast,
        past,
        alert_sent: false,
    }
}

/// Plain-text message for the automatic high-risk alert.
pub fn format_alert_message(location_name: &str, summary: &ForecastSummary) -> String {
    format!(
        "⚠️ High flood risk in {} within the next 3 days!\nMax Rainfall: {:.1} mm\nTime: {}",
        location_name, summary.risk_next_3_days.max_rain, summary.current.time
    )
}
