//! Injectable wall clock over the fixed civil timezone.
//!
//! All day-boundary comparisons happen in UTC+8 (the monitored coordinate's
//! timezone, which has no DST), so a plain `FixedOffset` is enough.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// The monitored coordinate's UTC offset, hours.
pub const LOCAL_UTC_OFFSET_HOURS: i32 = 8;

/// Time source for capture timestamps and calendar-day comparisons.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// The current calendar date in the local timezone.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real wall clock in the fixed local timezone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new() -> Self {
        let offset = FixedOffset::east_opt(LOCAL_UTC_OFFSET_HOURS * 3600)
            .expect("valid fixed UTC offset");
        Self { offset }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}
