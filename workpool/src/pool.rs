//! The worker pool: a fixed set of persistent threads, each bound to one
//! reusable context object, pulling one job at a time from its own
//! handoff channel.
//!
//! # Lifecycle
//! 1. `configure(num_threads, priority)` — validated, rejected values keep
//!    the old configuration
//! 2. `start()` — spawns workers; a failed spawn drops that slot (logged);
//!    zero usable workers degrades to synchronous execution on the caller's
//!    thread with a single shared context
//! 3. `submit(job)` — non-blocking scan for a free worker; blocks for the
//!    next completion signal when all are busy, then retries once
//! 4. `shutdown()` — joins workers, releases contexts; idempotent
//!
//! No ordering is guaranteed between concurrently submitted jobs.

use crate::error::PoolError;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Hard upper bound on the configurable worker count.
pub const MAX_THREADS: usize = 32;

/// How long `submit` waits for a completion signal before declaring the
/// pool exhausted. Steady-state jobs finish well inside this bound; hitting
/// it means a worker died or a job never returned.
const COMPLETION_WAIT: Duration = Duration::from_secs(30);

/// Lifecycle hooks a job-producing subsystem implements to use the pool.
///
/// `initialize` runs once per worker (and once for the synchronous
/// fallback context); `prepare` runs immediately before each `execute`;
/// `destroy` consumes the context at shutdown.
pub trait PoolManager: Send + Sync + 'static {
    /// Persistent per-worker state, created once and reused across jobs.
    type Context: Send + 'static;
    /// One unit of work.
    type Job: Send + 'static;

    fn initialize(&self) -> Self::Context;

    fn prepare(&self, _cx: &mut Self::Context) {}

    fn execute(&self, cx: &mut Self::Context, job: Option<Self::Job>);

    fn destroy(&self, _cx: Self::Context) {}
}

/// Free-worker bookkeeping, separate from worker execution state so the
/// scan never blocks behind a running job.
struct AvailableSet {
    ids: Mutex<Vec<usize>>,
    completed: Condvar,
}

struct Worker<J> {
    sender: Sender<J>,
    handle: Option<JoinHandle<()>>,
}

/// Fixed-size thread pool dispatching one job at a time per worker.
pub struct ThreadPool<M: PoolManager> {
    manager: Arc<M>,
    num_threads: usize,
    priority: f64,
    workers: Vec<Worker<M::Job>>,
    available: Arc<AvailableSet>,
    /// Context for synchronous single-threaded mode.
    sync_context: Option<M::Context>,
    started: bool,
}

impl<M: PoolManager> ThreadPool<M> {
    pub fn new(manager: M) -> Self {
        Self {
            manager: Arc::new(manager),
            num_threads: 0,
            priority: 0.5,
            workers: Vec::new(),
            available: Arc::new(AvailableSet {
                ids: Mutex::new(Vec::new()),
                completed: Condvar::new(),
            }),
            sync_context: None,
            started: false,
        }
    }

    /// Set worker count and scheduling priority for the next `start`.
    /// Rejected values leave the previous configuration in place.
    ///
    /// `priority` is validated and logged but not applied to the spawned
    /// threads: the standard library exposes no portable thread priority.
    /// It is carried so callers keep a stable configuration surface.
    pub fn configure(&mut self, num_threads: usize, priority: f64) -> Result<(), PoolError> {
        if num_threads > MAX_THREADS {
            return Err(PoolError::InvalidConfig(format!(
                "num_threads {num_threads} out of range [0 ..= {MAX_THREADS}]"
            )));
        }
        if !(0.0..=1.0).contains(&priority) || !priority.is_finite() {
            return Err(PoolError::InvalidConfig(format!(
                "priority {priority} out of range [0 .. 1]"
            )));
        }
        self.num_threads = num_threads;
        self.priority = priority;
        Ok(())
    }

    /// Spawn the configured workers. A slot whose thread cannot be created
    /// is dropped with a warning; if no worker is usable the pool degrades
    /// to synchronous execution on the submitting thread.
    pub fn start(&mut self) {
        self.shutdown();

        for _ in 0..self.num_threads {
            let id = self.workers.len();
            let (sender, receiver) = mpsc::channel::<M::Job>();
            let manager = Arc::clone(&self.manager);
            let available = Arc::clone(&self.available);

            let spawned = thread::Builder::new()
                .name(format!("workpool-{id}"))
                .spawn(move || {
                    // The persistent context lives and dies on this thread.
                    let mut cx = manager.initialize();
                    loop {
                        {
                            let mut ids = available.ids.lock().expect("available set poisoned");
                            ids.push(id);
                            available.completed.notify_all();
                        }
                        let Ok(job) = receiver.recv() else {
                            break; // pool shut down
                        };
                        manager.prepare(&mut cx);
                        manager.execute(&mut cx, Some(job));
                    }
                    manager.destroy(cx);
                });

            match spawned {
                Ok(handle) => {
                    debug!(worker = id, "worker thread created");
                    self.workers.push(Worker {
                        sender,
                        handle: Some(handle),
                    });
                }
                Err(e) => {
                    warn!(worker = id, error = %e, "failed to create worker thread, slot dropped");
                }
            }
        }

        if self.workers.is_empty() {
            info!("running pool in single-threaded mode");
            self.sync_context = Some(self.manager.initialize());
        } else {
            info!(
                workers = self.workers.len(),
                requested = self.num_threads,
                priority = self.priority,
                "running pool in multi-threaded mode"
            );
        }
        self.started = true;
    }

    /// Hand one job to an available worker, blocking for the next
    /// completion signal if all are busy. In single-threaded mode the job
    /// runs inline on the calling thread before `submit` returns.
    pub fn submit(&mut self, job: M::Job) -> Result<(), PoolError> {
        if !self.started {
            return Err(PoolError::NotStarted);
        }

        if self.workers.is_empty() {
            let cx = self.sync_context.as_mut().ok_or(PoolError::NotStarted)?;
            self.manager.prepare(cx);
            self.manager.execute(cx, Some(job));
            return Ok(());
        }

        let id = {
            let ids = self.available.ids.lock().expect("available set poisoned");
            // Non-blocking scan first; wait for a completion only when
            // every worker is busy.
            let (mut ids, wait) = self
                .available
                .completed
                .wait_timeout_while(ids, COMPLETION_WAIT, |ids| ids.is_empty())
                .expect("available set poisoned");
            match ids.pop() {
                Some(id) => id,
                None => {
                    // The wait postcondition failed: no worker reported
                    // completion. Surface this apart from backpressure.
                    debug_assert!(wait.timed_out());
                    return Err(PoolError::Exhausted);
                }
            }
        };

        self.workers[id]
            .sender
            .send(job)
            .map_err(|_| PoolError::Exhausted)?;
        Ok(())
    }

    /// Number of usable worker threads (0 in single-threaded mode).
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Block until every worker is idle (all submitted jobs finished).
    pub fn wait_idle(&self) {
        if self.workers.is_empty() {
            return; // synchronous mode: submit already ran everything
        }
        let ids = self.available.ids.lock().expect("available set poisoned");
        let n = self.workers.len();
        let _ids = self
            .available
            .completed
            .wait_timeout_while(ids, COMPLETION_WAIT, |ids| ids.len() < n)
            .expect("available set poisoned");
    }

    /// Stop and join all workers and release the synchronous context.
    /// Safe to call repeatedly, and safe after a partially failed `start`.
    pub fn shutdown(&mut self) {
        for worker in self.workers.drain(..) {
            drop(worker.sender); // worker loop exits on channel close
            if let Some(handle) = worker.handle {
                if handle.join().is_err() {
                    warn!("worker thread panicked during shutdown");
                }
            }
        }
        self.available
            .ids
            .lock()
            .expect("available set poisoned")
            .clear();
        if let Some(cx) = self.sync_context.take() {
            self.manager.destroy(cx);
        }
        self.started = false;
    }
}

impl<M: PoolManager> Drop for ThreadPool<M> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
