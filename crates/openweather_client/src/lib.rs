//! OpenWeatherMap client.
//!
//! Fetches the 5-day / 3-hour forecast from `api.openweathermap.org` and
//! maps it to the ordered `ForecastSample` list the evaluator consumes.

use common::{Error, ForecastSample, LocationConfig};
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// OpenWeatherMap API client with connection pooling.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

// ── Response types ────────────────────────────────────────────────────

/// Response body of `/data/2.5/forecast`.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

/// One 3-hour entry of the forecast list.
#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    #[serde(default)]
    pub dt_txt: String,
    #[serde(default)]
    pub rain: Option<RainVolume>,
}

/// Accumulated rain volume; the upstream omits the whole object when dry.
#[derive(Debug, Deserialize)]
pub struct RainVolume {
    #[serde(rename = "3h", default)]
    pub three_hour: Option<f64>,
}

impl ForecastEntry {
    /// Rainfall for this bucket in millimeters; absent field means 0.
    pub fn rain_mm(&self) -> f64 {
        self.rain
            .as_ref()
            .and_then(|r| r.three_hour)
            .unwrap_or(0.0)
    }
}

// ── Implementation ────────────────────────────────────────────────────

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("failed to build OpenWeatherMap HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the ordered 3-hour forecast for a coordinate, metric units.
    pub async fn fetch_forecast(
        &self,
        location: &LocationConfig,
    ) -> Result<Vec<ForecastSample>, Error> {
        let url = format!("{}/data/2.5/forecast", self.base_url);

        debug!("Fetching OpenWeatherMap forecast for {}", location.name);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("HTTP error for {}: {}", location.name, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(500).collect();
            return Err(Error::Upstream(format!(
                "OpenWeatherMap returned {} for {}: {}",
                status, location.name, snippet
            )));
        }

        let data: ForecastResponse = resp
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("JSON parse error for {}: {}", location.name, e)))?;

        debug!(
            "Got {} forecast buckets for {}",
            data.list.len(),
            location.name
        );

        Ok(data
            .list
            .into_iter()
            .map(|entry| ForecastSample {
                rain_mm: entry.rain_mm(),
                time: entry.dt_txt,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_with_rain() {
        let json = r#"{"dt_txt": "2026-08-29 12:00:00", "rain": {"3h": 2.75}}"#;
        let entry: ForecastEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.rain_mm(), 2.75);
        assert_eq!(entry.dt_txt, "2026-08-29 12:00:00");
    }

    #[test]
    fn test_missing_rain_field_is_zero() {
        let json = r#"{"dt_txt": "2026-08-29 15:00:00"}"#;
        let entry: ForecastEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.rain_mm(), 0.0);
    }

    #[test]
    fn test_empty_rain_object_is_zero() {
        let json = r#"{"dt_txt": "2026-08-29 18:00:00", "rain": {}}"#;
        let entry: ForecastEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.rain_mm(), 0.0);
    }

    #[test]
    fn test_parse_forecast_list_order_preserved() {
        let json = r#"{"list": [
            {"dt_txt": "a", "rain": {"3h": 1.0}},
            {"dt_txt": "b"},
            {"dt_txt": "c", "rain": {"3h": 0.5}}
        ]}"#;
        let resp: ForecastResponse = serde_json::from_str(json).unwrap();
        let rains: Vec<f64> = resp.list.iter().map(|e| e.rain_mm()).collect();
        assert_eq!(rains, vec![1.0, 0.0, 0.5]);
    }
}
