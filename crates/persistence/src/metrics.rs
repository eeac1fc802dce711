//! Query timing and connection pool gauges.

use std::time::Instant;

use metrics::{gauge, histogram};
use sqlx::PgPool;

/// Times one repository call. Dropping it without [`QueryTimer::finish`]
/// records nothing.
pub struct QueryTimer {
    query: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            started: Instant::now(),
        }
    }

    /// Records the elapsed time, labelled by query name and whether the
    /// query succeeded.
    pub fn finish<T>(self, result: &Result<T, sqlx::Error>) {
        record_query_duration(self.query, outcome(result), self.started.elapsed().as_secs_f64());
    }
}

fn outcome<T>(result: &Result<T, sqlx::Error>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(sqlx::Error::RowNotFound) => "not_found",
        Err(_) => "error",
    }
}

pub fn record_query_duration(query: &'static str, outcome: &'static str, secs: f64) {
    histogram!("db_query_duration_seconds", "query" => query, "outcome" => outcome).record(secs);
}

/// Publishes pool occupancy. Called on a timer by the pool metrics job.
pub fn record_pool_metrics(pool: &PgPool) {
    let total = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("db_pool_connections", "state" => "idle").set(idle as f64);
    gauge!("db_pool_connections", "state" => "in_use").set(total.saturating_sub(idle) as f64);
}
