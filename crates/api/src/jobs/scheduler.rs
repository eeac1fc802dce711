//! Interval scheduler for background jobs.
//!
//! Each registered job gets its own task on a fixed period. A run that
//! overruns its period pushes the next tick back rather than firing a burst.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFrequency {
    Seconds(u64),
    Minutes(u64),
}

impl JobFrequency {
    pub fn duration(&self) -> Duration {
        let secs = match *self {
            JobFrequency::Seconds(secs) => secs,
            JobFrequency::Minutes(mins) => mins.saturating_mul(60),
        };
        Duration::from_secs(secs)
    }
}

/// A unit of periodic background work.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// Stable name used in log fields.
    fn name(&self) -> &'static str;

    fn frequency(&self) -> JobFrequency;

    /// Run once immediately on start instead of waiting a full period.
    fn run_at_start(&self) -> bool {
        false
    }

    async fn execute(&self) -> Result<(), String>;
}

pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    stop: watch::Sender<bool>,
    tasks: JoinSet<()>,
}

impl JobScheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            stop: watch::Sender::new(false),
            tasks: JoinSet::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawns one task per registered job.
    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");
        for job in self.jobs.clone() {
            self.tasks.spawn(run_periodically(job, self.stop.subscribe()));
        }
    }

    /// Asks every job task to stop after its current run.
    pub fn shutdown(&self) {
        info!("Stopping job scheduler");
        self.stop.send_replace(true);
    }

    /// Waits up to `timeout` for job tasks to finish, then aborts the rest.
    pub async fn wait_for_shutdown(mut self, timeout: Duration) {
        let drain = async {
            while let Some(joined) = self.tasks.join_next().await {
                if let Err(e) = joined {
                    warn!(error = %e, "Job task panicked");
                }
            }
        };

        if tokio::time::timeout(timeout, drain).await.is_err() {
            warn!(timeout_secs = timeout.as_secs(), "Job shutdown timed out, aborting");
            self.tasks.abort_all();
        } else {
            info!("Job scheduler stopped");
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_periodically(job: Arc<dyn Job>, mut stop: watch::Receiver<bool>) {
    let frequency = job.frequency();
    let mut ticks = tokio::time::interval(frequency.duration());
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Consume the immediate first tick.
    ticks.tick().await;
    if job.run_at_start() {
        run_once(job.as_ref()).await;
    }
    info!(job = job.name(), ?frequency, "Job scheduled");

    loop {
        tokio::select! {
            _ = ticks.tick() => run_once(job.as_ref()).await,
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
    }
    info!(job = job.name(), "Job stopped");
}

async fn run_once(job: &dyn Job) {
    let started = Instant::now();
    let result = job.execute().await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(()) => info!(job = job.name(), elapsed_ms, "Job finished"),
        Err(e) => error!(job = job.name(), elapsed_ms, error = %e, "Job failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe {
        runs: Arc<AtomicUsize>,
        at_start: bool,
        fails: bool,
    }

    #[async_trait::async_trait]
    impl Job for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn frequency(&self) -> JobFrequency {
            JobFrequency::Minutes(60)
        }

        fn run_at_start(&self) -> bool {
            self.at_start
        }

        async fn execute(&self) -> Result<(), String> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fails {
                return Err("boom".to_string());
            }
            Ok(())
        }
    }

    /// Runs a single probe job for a moment and returns how often it ran.
    async fn runs_after_start(at_start: bool, fails: bool) -> usize {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = JobScheduler::new();
        scheduler.register(Probe {
            runs: Arc::clone(&runs),
            at_start,
            fails,
        });
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.shutdown();
        scheduler.wait_for_shutdown(Duration::from_secs(2)).await;
        runs.load(Ordering::SeqCst)
    }

    #[test]
    fn test_frequency_durations() {
        assert_eq!(JobFrequency::Seconds(15).duration(), Duration::from_secs(15));
        assert_eq!(JobFrequency::Minutes(360).duration(), Duration::from_secs(21_600));
        assert_eq!(JobFrequency::Minutes(u64::MAX).duration(), Duration::from_secs(u64::MAX));
    }

    #[tokio::test]
    async fn test_run_at_start_runs_immediately() {
        assert_eq!(runs_after_start(true, false).await, 1);
    }

    #[tokio::test]
    async fn test_default_waits_a_full_period() {
        assert_eq!(runs_after_start(false, false).await, 0);
    }

    #[tokio::test]
    async fn test_failed_run_does_not_stop_scheduler() {
        assert_eq!(runs_after_start(true, true).await, 1);
    }

    #[tokio::test]
    async fn test_shutdown_without_start() {
        let scheduler = JobScheduler::default();
        scheduler.shutdown();
        scheduler.wait_for_shutdown(Duration::from_millis(10)).await;
    }
}
