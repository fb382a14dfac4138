//! Fixed-size worker pool for CPU-bound compute tasks.
//!
//! This crate provides [`WorkerPool`], a pool of OS threads consuming a
//! shared FIFO task queue. The pool knows nothing about numerical
//! semantics; callers submit closures and either fire-and-forget
//! ([`WorkerPool::execute`]) or wait for a result through a
//! [`TaskHandle`] ([`WorkerPool::submit`]).
//!
//! # Design
//!
//! - Queue protected by a `Mutex`, workers woken through a `Condvar`.
//! - A panicking task never takes its worker down: the panic is caught
//!   at the task boundary and either surfaced to the awaiting caller or
//!   logged and dropped.
//! - Shutdown wakes all workers, lets them drain the remaining queue,
//!   and joins them. Submission after shutdown is rejected.
//!
//! # Example
//!
//! ```rust
//! use compute_pool::WorkerPool;
//!
//! let pool = WorkerPool::new(4);
//! let handle = pool.submit(|| 2 + 2).unwrap();
//! assert_eq!(handle.wait().unwrap(), 4);
//! ```

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;

/// Errors surfaced by the worker pool.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The pool has been shut down; no further tasks are accepted.
    #[error("worker pool is shut down")]
    Shutdown,

    /// The awaited task panicked; the panic message is captured.
    #[error("task panicked: {0}")]
    TaskPanicked(String),

    /// The task was dropped before it could report a result.
    #[error("task was dropped before completing")]
    Disconnected,
}

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Queue state shared between submitters and workers.
struct PoolQueue {
    tasks: VecDeque<Job>,
    shutdown: bool,
}

struct PoolShared {
    queue: Mutex<PoolQueue>,
    available: Condvar,
}

/// Handle to a result-bearing task submitted to the pool.
///
/// Obtained from [`WorkerPool::submit`]; [`TaskHandle::wait`] blocks
/// until the task has run and yields its result, or the error that
/// terminated it.
pub struct TaskHandle<T> {
    receiver: mpsc::Receiver<Result<T, PoolError>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task completes and returns its result.
    ///
    /// A task that panicked yields [`PoolError::TaskPanicked`] carrying
    /// the panic message; other in-flight tasks are unaffected.
    pub fn wait(self) -> Result<T, PoolError> {
        self.receiver
            .recv()
            .unwrap_or(Err(PoolError::Disconnected))
    }
}

/// Fixed-size set of worker threads over a shared FIFO queue.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
    size: usize,
}

impl WorkerPool {
    /// Spawns a pool with `size` worker threads (at least one).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let shared = Arc::new(PoolShared {
            queue: Mutex::new(PoolQueue {
                tasks: VecDeque::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
        });

        let workers = (0..size)
            .map(|id| {
                let shared = Arc::clone(&shared);
                std::thread::Builder::new()
                    .name(format!("compute-worker-{id}"))
                    .spawn(move || worker_loop(shared))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            shared,
            workers,
            size,
        }
    }

    /// Number of worker threads in the pool.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Enqueues a fire-and-forget task and wakes one waiting worker.
    ///
    /// If the task panics the panic is logged and dropped; the worker
    /// keeps serving the queue.
    pub fn execute<F>(&self, task: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(Box::new(task))
    }

    /// Enqueues a result-bearing task and returns a handle to await it.
    pub fn submit<F, T>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        self.enqueue(Box::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(task))
                .map_err(|payload| PoolError::TaskPanicked(panic_message(&payload)));
            // The caller may have dropped the handle; nothing to do then.
            let _ = sender.send(outcome);
        }))?;
        Ok(TaskHandle { receiver })
    }

    fn enqueue(&self, job: Job) -> Result<(), PoolError> {
        let mut queue = self
            .shared
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if queue.shutdown {
            return Err(PoolError::Shutdown);
        }
        queue.tasks.push_back(job);
        drop(queue);
        self.shared.available.notify_one();
        Ok(())
    }

    /// Signals shutdown, wakes all workers, and joins them.
    ///
    /// Tasks already queued are drained before the workers exit; new
    /// submissions fail with [`PoolError::Shutdown`].
    pub fn shutdown(&mut self) {
        {
            let mut queue = self
                .shared
                .queue
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if queue.shutdown {
                return;
            }
            queue.shutdown = true;
        }
        self.shared.available.notify_all();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!("worker thread terminated abnormally");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: Arc<PoolShared>) {
    loop {
        let job = {
            let mut queue = shared
                .queue
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            loop {
                if let Some(job) = queue.tasks.pop_front() {
                    break job;
                }
                if queue.shutdown {
                    return;
                }
                queue = shared
                    .available
                    .wait(queue)
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
            }
        };

        // Fire-and-forget tasks reach this boundary unwrapped; a panic
        // here must not kill the worker.
        if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
            tracing::error!(panic = %panic_message(&payload), "dropped panicking pool task");
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
