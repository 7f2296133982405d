//! The forecast service: cache-first reads, single-flight refresh, and
//! once-per-day high-risk alerting.
//!
//! The upstream provider, notification sink, and clock are injected behind
//! object-safe traits so tests can drive day boundaries and upstream
//! payloads deterministically.

use std::sync::Arc;

use async_trait::async_trait;
use common::{Error, ForecastSample, ForecastSummary, LocationConfig, RiskLevel};
use openweather_client::OpenWeatherClient;
use telegram_client::TelegramClient;
use tracing::{info, warn};

use crate::cache::ForecastCache;
use crate::clock::Clock;
use crate::daily;
use crate::evaluate;

/// Source of ordered 3-hour forecast samples for a coordinate.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(&self, location: &LocationConfig)
        -> Result<Vec<ForecastSample>, Error>;
}

/// Destination for alert and report messages.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<(), Error>;
    async fn send_markdown(&self, text: &str) -> Result<(), Error>;
}

#[async_trait]
impl ForecastProvider for OpenWeatherClient {
    async fn fetch_forecast(
        &self,
        location: &LocationConfig,
    ) -> Result<Vec<ForecastSample>, Error> {
        OpenWeatherClient::fetch_forecast(self, location).await
    }
}

#[async_trait]
impl AlertSink for TelegramClient {
    async fn send_text(&self, text: &str) -> Result<(), Error> {
        TelegramClient::send_text(self, text).await
    }

    async fn send_markdown(&self, text: &str) -> Result<(), Error> {
        TelegramClient::send_markdown(self, text).await
    }
}

/// Owns the cache and answers the two operations the routes expose.
pub struct ForecastService {
    provider: Arc<dyn ForecastProvider>,
    sink: Arc<dyn AlertSink>,
    clock: Arc<dyn Clock>,
    cache: ForecastCache,
    location: LocationConfig,
}

impl ForecastService {
    pub fn new(
        provider: Arc<dyn ForecastProvider>,
        sink: Arc<dyn AlertSink>,
        clock: Arc<dyn Clock>,
        location: LocationConfig,
    ) -> Self {
        Self {
            provider,
            sink,
            clock,
            cache: ForecastCache::new(),
            location,
        }
    }

    /// Today's flood-risk summary, served from cache when possible.
    ///
    /// At most one upstream fetch per calendar day; at most one high-risk
    /// alert per capture day. An alert delivery failure is logged and never
    /// fails the forecast response. An upstream failure leaves the prior
    /// cache untouched.
    pub async fn get_forecast(&self) -> Result<ForecastSummary, Error> {
        if let Some(hit) = self.cache.get_for(self.clock.today()).await {
            return Ok(hit);
        }

        let _refresh = self.cache.begin_refresh().await;

        // Another miss may have refreshed while we waited for the guard.
        if let Some(hit) = self.cache.get_for(self.clock.today()).await {
            return Ok(hit);
        }

        let samples = self.provider.fetch_forecast(&self.location).await?;

        // Sample the capture instant once, after the fetch succeeds, so the
        // stored date and the alert dedup agree across a midnight straddle.
        let now = self.clock.now();
        let today = now.date_naive();

        let prev = self.cache.snapshot().await.map(|cached| cached.summary);
        let mut summary = evaluate::build_summary(&samples, now, prev);

        // The miss path runs once per day under the refresh guard, so
        // marking before the send is an atomic check-and-set per day.
        let fire_alert = summary.risk_next_3_days.level == RiskLevel::High;
        if fire_alert {
            summary.alert_sent = true;
        }

        self.cache.replace(summary.clone(), today).await;

        if fire_alert {
            let message = evaluate::format_alert_message(&self.location.name, &summary);
            match self.sink.send_text(&message).await {
                Ok(()) => info!("High-risk alert delivered for {}", today),
                Err(e) => warn!("High-risk alert delivery failed: {}", e),
            }
        }

        Ok(summary)
    }

    /// Fetch fresh data and push the daily Markdown report to the sink.
    ///
    /// Bypasses the cache entirely and never mutates it; both upstream and
    /// sink failures propagate to the caller.
    pub async fn send_daily_update(&self) -> Result<(), Error> {
        let samples = self.provider.fetch_forecast(&self.location).await?;
        let report = daily::build_daily_report(&samples, self.clock.now());
        let message = daily::format_daily_message(&self.location.name, &report);
        self.sink.send_markdown(&message).await?;
        info!("Daily update delivered for {}", self.location.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeProvider {
        responses: Mutex<VecDeque<Result<Vec<ForecastSample>, Error>>>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(responses: Vec<Result<Vec<ForecastSample>, Error>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ForecastProvider for FakeProvider {
        async fn fetch_forecast(
            &self,
            _location: &LocationConfig,
        ) -> Result<Vec<ForecastSample>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Upstream("fake provider exhausted".into())))
        }
    }

    #[derive(Default)]
    struct FakeSink {
        text_messages: Mutex<Vec<String>>,
        markdown_messages: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl AlertSink for FakeSink {
        async fn send_text(&self, text: &str) -> Result<(), Error> {
            if self.fail {
                return Err(Error::Notification("fake sink down".into()));
            }
            self.text_messages.lock().unwrap().push(text.into());
            Ok(())
        }

        async fn send_markdown(&self, text: &str) -> Result<(), Error> {
            if self.fail {
                return Err(Error::Notification("fake sink down".into()));
            }
            self.markdown_messages.lock().unwrap().push(text.into());
            Ok(())
        }
    }

    struct FakeClock {
        now: Mutex<DateTime<FixedOffset>>,
    }

    impl FakeClock {
        fn at(day: u32) -> Self {
            let offset = FixedOffset::east_opt(8 * 3600).unwrap();
            Self {
                now: Mutex::new(offset.with_ymd_and_hms(2026, 8, day, 9, 0, 0).unwrap()),
            }
        }

        fn advance_days(&self, days: i64) {
            let mut now = self.now.lock().unwrap();
            *now = *now + chrono::Duration::days(days);
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<FixedOffset> {
            *self.now.lock().unwrap()
        }
    }

    fn samples(rains: &[f64]) -> Vec<ForecastSample> {
        rains
            .iter()
            .enumerate()
            .map(|(i, &rain_mm)| ForecastSample {
                time: format!("sample-{i}"),
                rain_mm,
            })
            .collect()
    }

    fn low_risk_samples() -> Vec<ForecastSample> {
        samples(&[1.0; 32])
    }

    fn high_risk_samples() -> Vec<ForecastSample> {
        // Peak bucket 25 mm > 20 mm within the 24-sample scan window.
        let mut rains = vec![1.0; 32];
        rains[3] = 25.0;
        samples(&rains)
    }

    fn make_service(
        provider: Arc<FakeProvider>,
        sink: Arc<FakeSink>,
        clock: Arc<FakeClock>,
    ) -> ForecastService {
        ForecastService::new(provider, sink, clock, LocationConfig::default())
    }

    #[tokio::test]
    async fn test_same_day_second_call_is_served_from_cache() {
        let provider = Arc::new(FakeProvider::new(vec![Ok(low_risk_samples())]));
        let sink = Arc::new(FakeSink::default());
        let clock = Arc::new(FakeClock::at(1));
        let service = make_service(provider.clone(), sink.clone(), clock);

        let first = service.get_forecast().await.unwrap();
        let second = service.get_forecast().await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(first, second);
        assert!(sink.text_messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_new_day_triggers_fresh_fetch_and_past_grows() {
        let provider = Arc::new(FakeProvider::new(vec![
            Ok(low_risk_samples()),
            Ok(low_risk_samples()),
        ]));
        let sink = Arc::new(FakeSink::default());
        let clock = Arc::new(FakeClock::at(1));
        let service = make_service(provider.clone(), sink, clock.clone());

        let first = service.get_forecast().await.unwrap();
        clock.advance_days(1);
        let second = service.get_forecast().await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(second.past, vec![first.current]);
    }

    #[tokio::test]
    async fn test_alert_fires_once_per_day() {
        let provider = Arc::new(FakeProvider::new(vec![
            Ok(high_risk_samples()),
            Ok(high_risk_samples()),
        ]));
        let sink = Arc::new(FakeSink::default());
        let clock = Arc::new(FakeClock::at(1));
        let service = make_service(provider, sink.clone(), clock.clone());

        let first = service.get_forecast().await.unwrap();
        assert!(first.alert_sent);
        assert_eq!(first.risk_next_3_days.level, RiskLevel::High);

        // Same-day re-request: cache hit, no second alert.
        let again = service.get_forecast().await.unwrap();
        assert!(again.alert_sent);
        assert_eq!(sink.text_messages.lock().unwrap().len(), 1);

        // Next day: one more alert, two total.
        clock.advance_days(1);
        service.get_forecast().await.unwrap();
        assert_eq!(sink.text_messages.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_forecast() {
        let provider = Arc::new(FakeProvider::new(vec![Ok(high_risk_samples())]));
        let sink = Arc::new(FakeSink {
            fail: true,
            ..FakeSink::default()
        });
        let clock = Arc::new(FakeClock::at(1));
        let service = make_service(provider, sink, clock);

        let summary = service.get_forecast().await.unwrap();
        assert!(summary.alert_sent);
    }

    #[tokio::test]
    async fn test_upstream_failure_leaves_cache_intact() {
        let provider = Arc::new(FakeProvider::new(vec![
            Ok(low_risk_samples()),
            Err(Error::Upstream("503".into())),
            Ok(low_risk_samples()),
        ]));
        let sink = Arc::new(FakeSink::default());
        let clock = Arc::new(FakeClock::at(1));
        let service = make_service(provider, sink, clock.clone());

        let first = service.get_forecast().await.unwrap();

        clock.advance_days(1);
        let failed = service.get_forecast().await;
        assert!(matches!(failed, Err(Error::Upstream(_))));

        // Retry succeeds; the stale summary was preserved and feeds `past`.
        let third = service.get_forecast().await.unwrap();
        assert_eq!(third.past, vec![first.current]);
    }

    #[tokio::test]
    async fn test_daily_update_bypasses_and_preserves_cache() {
        let provider = Arc::new(FakeProvider::new(vec![
            Ok(low_risk_samples()),
            Ok(low_risk_samples()),
        ]));
        let sink = Arc::new(FakeSink::default());
        let clock = Arc::new(FakeClock::at(1));
        let service = make_service(provider.clone(), sink.clone(), clock);

        service.send_daily_update().await.unwrap();
        assert_eq!(provider.call_count(), 1);
        assert_eq!(sink.markdown_messages.lock().unwrap().len(), 1);

        // The cache was not populated by the update.
        service.get_forecast().await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_daily_update_propagates_sink_error() {
        let provider = Arc::new(FakeProvider::new(vec![Ok(low_risk_samples())]));
        let sink = Arc::new(FakeSink {
            fail: true,
            ..FakeSink::default()
        });
        let clock = Arc::new(FakeClock::at(1));
        let service = make_service(provider, sink, clock);

        let result = service.send_daily_update().await;
        assert!(matches!(result, Err(Error::Notification(_))));
    }

    #[tokio::test]
    async fn test_concurrent_misses_fetch_once() {
        let provider = Arc::new(FakeProvider::new(vec![Ok(low_risk_samples())]));
        let sink = Arc::new(FakeSink::default());
        let clock = Arc::new(FakeClock::at(1));
        let service = Arc::new(make_service(provider.clone(), sink, clock));

        let a = tokio::spawn({
            let service = service.clone();
            async move { service.get_forecast().await }
        });
        let b = tokio::spawn({
            let service = service.clone();
            async move { service.get_forecast().await }
        });

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert_eq!(a, b);
        assert_eq!(provider.call_count(), 1);
    }
}
