//! Daily-update report: today's total plus a day-by-day 3-day outlook.
//!
//! Windows are 8-sample (24-hour) slices: today is [0,8), the outlook days
//! are [8,16), [16,24), [24,32). The aggregate outlook total uses the
//! higher 30 mm threshold.

use chrono::{DateTime, FixedOffset};
use common::{ForecastSample, RiskLevel};

use crate::evaluate::{
    format_capture_time, rain_total, risk_for, round1, OUTLOOK_THRESHOLD_MM, SAMPLES_PER_DAY,
};

/// Number of day windows in the outlook.
pub const OUTLOOK_DAYS: usize = 3;

/// Aggregates backing one daily-update message.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    /// Localized generation time line.
    pub generated_at: String,
    /// Rainfall total over the next 24 hours, mm.
    pub today_rain_mm: f64,
    pub today_risk: RiskLevel,
    /// Rainfall totals for the three following days, mm.
    pub day_totals_mm: [f64; OUTLOOK_DAYS],
    /// Aggregate rainfall over the three following days, mm.
    pub outlook_rain_mm: f64,
    pub outlook_risk: RiskLevel,
}

/// Build the daily report from the ordered sample list.
pub fn build_daily_report(samples: &[ForecastSample], now: DateTime<FixedOffset>) -> DailyReport {
    let today_rain = rain_total(samples, 0, SAMPLES_PER_DAY);

    let mut day_totals = [0.0; OUTLOOK_DAYS];
    for (i, total) in day_totals.iter_mut().enumerate() {
        let start = (i + 1) * SAMPLES_PER_DAY;
        *total = round1(rain_total(samples, start, start + SAMPLES_PER_DAY));
    }

    let outlook_rain = rain_total(
        samples,
        SAMPLES_PER_DAY,
        (OUTLOOK_DAYS + 1) * SAMPLES_PER_DAY,
    );
    let outlook_risk = if outlook_rain > OUTLOOK_THRESHOLD_MM {
        RiskLevel::High
    } else {
        RiskLevel::Low
    };

    DailyReport {
        generated_at: format_capture_time(now),
        today_rain_mm: round1(today_rain),
        today_risk: risk_for(today_rain),
        day_totals_mm: day_totals,
        outlook_rain_mm: round1(outlook_rain),
        outlook_risk,
    }
}

/// Render the report as a Telegram Markdown message.
pub fn format_daily_message(location_name: &str, report: &DailyReport) -> String {
    format!(
        "🌤️ *{name} Daily Weather Update*\n\
         📅 Date: {date}\n\
         \n\
         ☔ *Today's Forecast*:\n\
         - Total Rain: *{today:.1} mm*\n\
         - Risk: *{today_risk}*\n\
         \n\
         🔮 *Upcoming 3 Days Outlook*:\n\
         - Total Rain: *{outlook:.1} mm*\n\
         - Per Day: *{d1:.1} / {d2:.1} / {d3:.1} mm*\n\
         - Risk: *{outlook_risk}*\n\
         \n\
         Stay prepared and safe!\n\
         #{tag} #FloodForecast",
        name = location_name,
        date = report.generated_at,
        today = report.today_rain_mm,
        today_risk = report.today_risk,
        outlook = report.outlook_rain_mm,
        d1 = report.day_totals_mm[0],
        d2 = report.day_totals_mm[1],
        d3 = report.day_totals_mm[2],
        outlook_risk = report.outlook_risk,
        tag = location_name,
    )
}
