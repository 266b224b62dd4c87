//! Batch execution engine for profiling many datasets with bounded parallelism.
//!
//! A single extraction is pure and single-threaded; this module runs many of them side by side:
//!
//! - Parallel profiling of files ([`ExecutionEngine::profile_paths`]) or in-memory grids
//!   ([`ExecutionEngine::extract_many`])
//! - A cap on concurrently running tasks, on top of the thread count
//! - Real-time metrics + observer hooks for monitoring
//!
//! Results always come back in input order, and running in parallel never changes any
//! individual result.

mod observer;
mod semaphore;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use tracing::info;

use crate::error::{ProfilingError, ProfilingResult};
use crate::ingestion::{profile_from_path, ProfileOptions};
use crate::profiling::extract_basic_metadata;
use crate::types::{DatasetMetadata, Grid};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Upper bound on concurrently running tasks.
    ///
    /// Useful to bound peak memory when each task holds a whole file in memory.
    pub max_in_flight: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            num_threads: Some(n),
            max_in_flight: n.max(1),
        }
    }
}

/// Result of profiling one path in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: ProfilingResult<DatasetMetadata>,
}

/// A configurable engine for batch profiling.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// Fails with [`ProfilingError::InvalidInput`] if `max_in_flight == 0`,
    /// `num_threads == Some(0)`, or the thread pool cannot be built.
    pub fn new(opts: ExecutionOptions) -> ProfilingResult<Self> {
        if opts.max_in_flight == 0 {
            return Err(ProfilingError::InvalidInput {
                message: "max_in_flight must be > 0".to_string(),
            });
        }
        if opts.num_threads == Some(0) {
            return Err(ProfilingError::InvalidInput {
                message: "num_threads must be > 0 when set".to_string(),
            });
        }

        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));

        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
            .map_err(|e| ProfilingError::InvalidInput {
                message: format!("failed to build thread pool: {e}"),
            })?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Profile every path in parallel with [`profile_from_path`].
    ///
    /// A failing file does not stop the batch; its error is returned in its [`BatchOutcome`].
    pub fn profile_paths(&self, paths: &[PathBuf], options: &ProfileOptions) -> Vec<BatchOutcome> {
        self.run(paths, |path| {
            let result = profile_from_path(path, options);
            let rows = result.as_ref().ok().map(|md| md.total_rows);
            (
                BatchOutcome {
                    path: path.clone(),
                    result,
                },
                rows,
            )
        })
    }

    /// Extract metadata for many in-memory grids in parallel.
    pub fn extract_many(&self, grids: &[Grid]) -> Vec<DatasetMetadata> {
        self.run(grids, |grid| {
            let md = extract_basic_metadata(grid);
            let rows = md.total_rows;
            (md, Some(rows))
        })
    }

    fn run<I, O, F>(&self, inputs: &[I], task: F) -> Vec<O>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> (O, Option<usize>) + Send + Sync,
    {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted { tasks: inputs.len() });

        let sem = Semaphore::new(self.opts.max_in_flight);
        let out: Vec<O> = self.pool.install(|| {
            inputs
                .par_iter()
                .enumerate()
                .map(|(index, input)| {
                    let permit = sem.acquire();
                    if permit.waited > Duration::ZERO {
                        self.metrics.on_throttle_wait(permit.waited);
                        self.emit(ExecutionEvent::ThrottleWaited {
                            duration: permit.waited,
                        });
                    }

                    self.metrics.on_task_start();
                    self.emit(ExecutionEvent::TaskStarted { index });

                    let (value, rows) = task(input);

                    self.emit(ExecutionEvent::TaskFinished { index, rows });
                    self.metrics.on_task_end(rows);
                    drop(permit);
                    value
                })
                .collect()
        });

        let elapsed = start.elapsed();
        self.metrics.end_run(elapsed);
        let snapshot = self.metrics.snapshot();
        info!(%snapshot, "batch profiling finished");
        self.emit(ExecutionEvent::RunFinished {
            elapsed,
            metrics: snapshot,
        });

        out
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExecutionEngine, ExecutionOptions};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::execution::{ExecutionEvent, ExecutionObserver};
    use crate::types::Grid;

    fn grid_of_n(n: usize) -> Grid {
        let mut g = vec![vec!["id".to_string(), "label".to_string()]];
        for i in 0..n {
            g.push(vec![i.to_string(), format!("row-{}", i % 3)]);
        }
        g
    }

    struct ConcurrencyObserver {
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl ConcurrencyObserver {
        fn new() -> Self {
            Self {
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
            }
        }
    }

    impl ExecutionObserver for ConcurrencyObserver {
        fn on_event(&self, event: &ExecutionEvent) {
            match event {
                ExecutionEvent::TaskStarted { .. } => {
                    let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                    self.max_active.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
                ExecutionEvent::TaskFinished { .. } => {
                    self.active.fetch_sub(1, Ordering::SeqCst);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn extract_many_preserves_order_and_matches_sequential() {
        let grids: Vec<Grid> = (1..=40).map(grid_of_n).collect();
        let engine = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(4),
            max_in_flight: 4,
        })
        .unwrap();

        let out = engine.extract_many(&grids);
        assert_eq!(out.len(), grids.len());
        for (i, md) in out.iter().enumerate() {
            assert_eq!(md.total_rows, i + 1);
            let seq = crate::profiling::extract_basic_metadata(&grids[i]);
            assert!(md.same_content(&seq));
        }
    }

    #[test]
    fn max_in_flight_throttles_task_concurrency() {
        let grids: Vec<Grid> = (0..50).map(|_| grid_of_n(10)).collect();
        let observer = Arc::new(ConcurrencyObserver::new());
        let obs_trait: Arc<dyn ExecutionObserver> = observer.clone();
        let engine = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(4),
            max_in_flight: 1,
        })
        .unwrap()
        .with_observer(obs_trait);

        let out = engine.extract_many(&grids);
        assert_eq!(out.len(), 50);
        assert_eq!(observer.max_active.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn metrics_are_available_after_run() {
        let grids: Vec<Grid> = (0..12).map(|_| grid_of_n(5)).collect();
        let engine = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(2),
            max_in_flight: 1,
        })
        .unwrap();
        let metrics = engine.metrics();

        engine.extract_many(&grids);

        let snap = metrics.snapshot();
        assert_eq!(snap.run_id, 1);
        assert_eq!(snap.tasks_started, 12);
        assert_eq!(snap.tasks_finished, 12);
        assert_eq!(snap.tasks_failed, 0);
        assert_eq!(snap.rows_profiled, 60);
        assert_eq!(snap.max_active_tasks, 1);
        assert!(snap.elapsed.is_some());
    }

    #[test]
    fn zero_in_flight_is_rejected() {
        let err = ExecutionEngine::new(ExecutionOptions {
            num_threads: Some(1),
            max_in_flight: 0,
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("max_in_flight"));
    }
}
