//! Forecast core: rainfall aggregation, risk classification, the same-day
//! memoization cache, and the orchestrating service.

pub mod cache;
pub mod clock;
pub mod daily;
pub mod evaluate;
pub mod service;

pub use cache::ForecastCache;
pub use clock::{Clock, SystemClock};
pub use service::{AlertSink, ForecastProvider, ForecastService};
