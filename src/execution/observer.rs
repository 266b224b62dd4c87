use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Events emitted by the batch engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { tasks: usize },
    ThrottleWaited { duration: Duration },
    TaskStarted { index: usize },
    /// `rows` is `None` when the task failed.
    TaskFinished { index: usize, rows: Option<usize> },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// A simple stderr logger for execution events.
#[derive(Default)]
pub struct StdErrExecutionObserver;

impl ExecutionObserver for StdErrExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        eprintln!("{event:?}");
    }
}

/// Real-time counters for a batch run.
///
/// The engine updates these during execution; callers can snapshot them at any time.
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    tasks_started: AtomicU64,
    tasks_finished: AtomicU64,
    tasks_failed: AtomicU64,
    rows_profiled: AtomicU64,
    throttle_wait_ns: AtomicU64,

    active_tasks: AtomicUsize,
    max_active_tasks: AtomicUsize,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            tasks_started: AtomicU64::new(0),
            tasks_finished: AtomicU64::new(0),
            tasks_failed: AtomicU64::new(0),
            rows_profiled: AtomicU64::new(0),
            throttle_wait_ns: AtomicU64::new(0),
            active_tasks: AtomicUsize::new(0),
            max_active_tasks: AtomicUsize::new(0),
        }
    }

    pub(crate) fn begin_run(&self) {
        self.run_id.fetch_add(1, Ordering::SeqCst);
        for counter in [
            &self.elapsed_ns,
            &self.tasks_started,
            &self.tasks_finished,
            &self.tasks_failed,
            &self.rows_profiled,
            &self.throttle_wait_ns,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
        self.active_tasks.store(0, Ordering::SeqCst);
        self.max_active_tasks.store(0, Ordering::SeqCst);
    }

    pub(crate) fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(as_nanos_u64(elapsed), Ordering::SeqCst);
    }

    pub(crate) fn on_task_start(&self) {
        self.tasks_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_tasks.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_tasks.fetch_max(now, Ordering::SeqCst);
    }

    pub(crate) fn on_task_end(&self, rows: Option<usize>) {
        match rows {
            Some(n) => {
                self.rows_profiled.fetch_add(n as u64, Ordering::SeqCst);
            }
            None => {
                self.tasks_failed.fetch_add(1, Ordering::SeqCst);
            }
        }
        self.tasks_finished.fetch_add(1, Ordering::SeqCst);
        self.active_tasks.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn on_throttle_wait(&self, d: Duration) {
        self.throttle_wait_ns.fetch_add(as_nanos_u64(d), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            tasks_started: self.tasks_started.load(Ordering::SeqCst),
            tasks_finished: self.tasks_finished.load(Ordering::SeqCst),
            tasks_failed: self.tasks_failed.load(Ordering::SeqCst),
            rows_profiled: self.rows_profiled.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_tasks: self.max_active_tasks.load(Ordering::SeqCst),
        }
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn as_nanos_u64(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub tasks_started: u64,
    pub tasks_finished: u64,
    pub tasks_failed: u64,
    pub rows_profiled: u64,
    pub throttle_wait: Duration,
    pub max_active_tasks: usize,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, tasks={}/{} (failed={}), rows_profiled={}, max_active_tasks={}, throttle_wait={:?}, elapsed={:?}",
            self.run_id,
            self.tasks_finished,
            self.tasks_started,
            self.tasks_failed,
            self.rows_profiled,
            self.max_active_tasks,
            self.throttle_wait,
            self.elapsed
        )
    }
}
