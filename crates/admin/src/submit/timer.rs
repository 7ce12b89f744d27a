//! Elapsed-seconds counter for in-flight submissions.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Counts whole seconds while a request is in flight.
///
/// The counter runs on its own task and publishes on a `watch` channel so
/// progress views can read it without touching the request. Dropping the
/// timer aborts the task, so whichever way the owning operation ends the
/// counter stops exactly once.
#[derive(Debug)]
pub struct ElapsedTimer {
    elapsed: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl ElapsedTimer {
    /// Start counting with a one second period.
    #[must_use]
    pub fn start() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    /// Start counting with a custom period.
    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        let (tx, elapsed) = watch::channel(0);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                tx.send_modify(|ticks| *ticks += 1);
            }
        });
        Self { elapsed, task }
    }

    /// A receiver that keeps the last published count after the timer stops.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.elapsed.clone()
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        *self.elapsed.borrow()
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
