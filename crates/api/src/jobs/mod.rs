//! Background jobs run by the in-process scheduler.

mod pool_metrics;
mod scheduler;
mod scrape_events;

pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use scrape_events::ScrapeEventsJob;
