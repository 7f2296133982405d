//! Same-day memoization cache with single-flight refresh.
//!
//! One slot holds the most recent summary and its capture date. Same-day
//! hits take only the read lock; the miss path serializes on a separate
//! refresh mutex so concurrent misses trigger exactly one upstream fetch
//! and hits never wait behind an in-flight refresh.

use chrono::NaiveDate;
use common::ForecastSummary;
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// The cached summary plus the calendar day it was computed on.
#[derive(Debug, Clone)]
pub struct CachedDay {
    pub summary: ForecastSummary,
    pub captured_on: NaiveDate,
}

/// Single-slot cache keyed by capture date.
#[derive(Debug, Default)]
pub struct ForecastCache {
    slot: RwLock<Option<CachedDay>>,
    refresh: Mutex<()>,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached summary if it was captured on `day`.
    pub async fn get_for(&self, day: NaiveDate) -> Option<ForecastSummary> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|cached| cached.captured_on == day)
            .map(|cached| cached.summary.clone())
    }

    /// The current slot regardless of day, for building `past`.
    pub async fn snapshot(&self) -> Option<CachedDay> {
        self.slot.read().await.clone()
    }

    /// Overwrite the slot with a freshly computed summary.
    pub async fn replace(&self, summary: ForecastSummary, day: NaiveDate) {
        *self.slot.write().await = Some(CachedDay {
            summary,
            captured_on: day,
        });
    }

    /// Acquire the refresh guard. Held across the whole miss path
    /// (fetch, build, replace, alert); hits never touch it.
    pub async fn begin_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh.lock().await
    }
}
