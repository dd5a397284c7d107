//! Periodic refresh tasks.
//!
//! Each task runs on its own tokio task and is owned by a [`RefreshHandle`].
//! Dropping the handle, or the [`Scheduler`] holding it, aborts the task; a
//! tick already in progress is abandoned at its next await point.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

/// Owner of one running refresh loop.
#[derive(Debug)]
pub struct RefreshHandle {
    name: String,
    period: Duration,
    ticks: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Completed runs so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the loop now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(task = %self.name, ticks = self.ticks(), "Refresh task stopped");
    }
}

/// Runs `task` immediately and then every `period`.
///
/// Ticks that fall behind are skipped rather than bunched up. Must be
/// called from within a tokio runtime.
pub fn spawn_every<F, Fut>(name: impl Into<String>, period: Duration, mut task: F) -> RefreshHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let name = name.into();
    let ticks = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&ticks);
    let task_name = name.clone();
    let handle = tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            timer.tick().await;
            task().await;
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(task = %task_name, tick = n, "Refresh tick");
        }
    });
    info!(task = %name, period_secs = period.as_secs_f64(), "Refresh task started");
    RefreshHandle {
        name,
        period,
        ticks,
        handle,
    }
}

/// A named set of refresh loops with a shared lifetime.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<RefreshHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a loop, replacing any running loop of the same name.
    pub fn every<F, Fut>(&mut self, name: impl Into<String>, period: Duration, task: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = spawn_every(name, period, task);
        self.tasks.retain(|t| t.name != handle.name);
        self.tasks.push(handle);
    }

    /// Stops the named loop. Returns whether it was running.
    pub fn cancel(&mut self, name: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.name != name);
        before != self.tasks.len()
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RefreshHandle> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Stops every loop.
    pub fn shutdown(&mut self) {
        info!(tasks = self.tasks.len(), "Stopping refresh tasks");
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn counter() -> (Arc<AtomicU64>, impl FnMut() -> std::future::Ready<()> + Send + 'static) {
        let count = Arc::new(AtomicU64::new(0));
        let inner = Arc::clone(&count);
        let task = move || {
            inner.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        };
        (count, task)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_periodically() {
        let (count, task) = counter();
        let handle = spawn_every("book", Duration::from_secs(5), task);

        sleep(Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(handle.ticks(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let (count, task) = counter();
        let handle = spawn_every("arb", Duration::from_secs(10), task);
        sleep(Duration::from_millis(10)).await;
        drop(handle);

        sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_cancel_and_replace() {
        let mut scheduler = Scheduler::new();
        let (first, task) = counter();
        scheduler.every("chart", Duration::from_secs(30), task);
        let (second, task) = counter();
        scheduler.every("chart", Duration::from_secs(30), task);
        assert_eq!(scheduler.len(), 1);

        sleep(Duration::from_secs(31)).await;
        assert!(first.load(Ordering::SeqCst) <= 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);

        assert!(scheduler.cancel("chart"));
        assert!(!scheduler.cancel("chart"));
        assert!(scheduler.is_empty());
    }
}
