//! Fixed-size worker pool
//!
//! Workers drain one shared FIFO queue. A worker only blocks while the queue
//! is empty and no stop has been requested. Shutdown lets running tasks
//! finish and drops everything still queued.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::log::Log;
use crate::platform::{Platform, ThreadPriority};
use crate::{bridge_debug, bridge_error, bridge_info};

/// Upper bound on the derived worker count
pub const MAX_DEFAULT_WORKERS: u32 = 32;

type Task = Box<dyn FnOnce() + Send + 'static>;

struct QueueState {
    tasks: VecDeque<Task>,
    stop: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    cond: Condvar,
    busy: AtomicU32,
    log: Log,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Worker count for a machine with `cores` hardware threads
///
/// Roughly five sevenths of the cores minus one, clamped to `1..=32`.
pub fn default_worker_count(cores: u32) -> u32 {
    let workers = ((cores.max(1) - 1) * 5) / 7;
    workers.clamp(1, MAX_DEFAULT_WORKERS)
}

/// Pool of long-lived worker threads
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: u32,
}

impl ThreadPool {
    /// Start the workers
    ///
    /// # Arguments
    ///
    /// * `num_threads` - Worker count; 0 derives it from the platform's core count
    /// * `priority` - Priority each worker requests for itself
    /// * `platform` - Core count and thread priority provider
    /// * `log` - Sink for pool diagnostics
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if a worker thread cannot be spawned.
    /// Workers spawned before the failure are stopped and joined.
    pub fn new(
        num_threads: u32,
        priority: ThreadPriority,
        platform: Arc<dyn Platform>,
        log: Log,
    ) -> Result<Self> {
        let worker_count = if num_threads > 0 {
            num_threads
        } else {
            default_worker_count(platform.core_count())
        };

        bridge_info!(log, "bridge::pool", "Using {} compiler threads", worker_count);

        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                stop: false,
            }),
            cond: Condvar::new(),
            busy: AtomicU32::new(worker_count),
            log,
        });

        let pool = Self {
            shared,
            workers: Mutex::new(Vec::with_capacity(worker_count as usize)),
            worker_count,
        };

        for index in 0..worker_count {
            let shared = Arc::clone(&pool.shared);
            let platform = Arc::clone(&platform);

            let spawned = thread::Builder::new()
                .name(format!("shader-bridge-worker-{}", index))
                .spawn(move || {
                    if !platform.set_thread_priority(priority) {
                        bridge_debug!(
                            shared.log,
                            "bridge::pool",
                            "Thread priority {:?} not applied to worker {}",
                            priority,
                            index
                        );
                    }
                    worker_loop(&shared);
                });

            match spawned {
                Ok(handle) => pool
                    .workers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(handle),
                Err(e) => {
                    // Workers that never started cannot report idle
                    pool.shared
                        .busy
                        .fetch_sub(worker_count - index, Ordering::SeqCst);
                    pool.shutdown();
                    return Err(Error::InitializationFailed(format!(
                        "failed to spawn worker {}: {}",
                        index, e
                    )));
                }
            }
        }

        Ok(pool)
    }

    /// Start a pool sized and prioritized by `config`
    pub fn from_config(config: &BridgeConfig, platform: Arc<dyn Platform>, log: Log) -> Result<Self> {
        Self::new(
            config.num_compiler_threads,
            config.compiler_priority,
            platform,
            log,
        )
    }

    /// Queue `task` and wake one idle worker
    ///
    /// # Errors
    ///
    /// Returns `PoolStopped` once shutdown has begun.
    pub fn enqueue<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.lock();
        if state.stop {
            bridge_error!(self.shared.log, "bridge::pool", "Task enqueued after shutdown");
            return Err(Error::PoolStopped);
        }

        state.tasks.push_back(Box::new(task));
        self.shared.cond.notify_one();
        Ok(())
    }

    /// Queue `f` and get a handle to its result
    ///
    /// # Errors
    ///
    /// Returns `PoolStopped` once shutdown has begun.
    pub fn submit<T, F>(&self, f: F) -> Result<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(1);
        self.enqueue(move || {
            // The caller may have dropped the handle
            let _ = sender.send(f());
        })?;
        Ok(TaskHandle { receiver })
    }

    /// Workers not currently waiting for work
    pub fn running(&self) -> u32 {
        self.shared.busy.load(Ordering::SeqCst)
    }

    pub fn worker_count(&self) -> u32 {
        self.worker_count
    }

    /// Number of queued tasks no worker has picked up yet
    pub fn pending(&self) -> usize {
        self.shared.lock().tasks.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.lock().stop
    }

    /// Stop accepting work, wake every worker and join them
    ///
    /// Running tasks complete; queued tasks are dropped. Safe to call more
    /// than once.
    pub fn shutdown(&self) {
        {
            let mut state = self.shared.lock();
            state.stop = true;
            self.shared.cond.notify_all();
        }

        let workers = std::mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner));
        let current = thread::current().id();

        for worker in workers {
            // A task shutting down its own pool cannot join itself
            if worker.thread().id() == current {
                continue;
            }
            if worker.join().is_err() {
                bridge_error!(self.shared.log, "bridge::pool", "Worker thread panicked");
            }
        }

        let dropped = {
            let mut state = self.shared.lock();
            let count = state.tasks.len();
            state.tasks.clear();
            count
        };

        if dropped > 0 {
            bridge_debug!(
                self.shared.log,
                "bridge::pool",
                "Dropped {} queued task(s) at shutdown",
                dropped
            );
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let task = {
            let mut state = shared.lock();

            if state.stop {
                shared.busy.fetch_sub(1, Ordering::SeqCst);
                break;
            }

            if state.tasks.is_empty() {
                shared.busy.fetch_sub(1, Ordering::SeqCst);
                state = shared
                    .cond
                    .wait_while(state, |s| s.tasks.is_empty() && !s.stop)
                    .unwrap_or_else(PoisonError::into_inner);

                if !state.tasks.is_empty() {
                    shared.busy.fetch_add(1, Ordering::SeqCst);
                }
            }

            match state.tasks.pop_front() {
                Some(task) => task,
                None => break,
            }
        };

        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            bridge_error!(shared.log, "bridge::pool", "Task panicked on a worker thread");
        }
    }
}

/// Result of a task queued with `ThreadPool::submit`
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: mpsc::Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Block until the task has run
    ///
    /// # Errors
    ///
    /// Returns `TaskAborted` if the task panicked or was dropped unrun.
    pub fn wait(self) -> Result<T> {
        self.receiver.recv().map_err(|_| Error::TaskAborted)
    }

    /// The result if the task already finished, `None` while it is pending
    pub fn try_wait(&self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(value) => Some(Ok(value)),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(Error::TaskAborted)),
        }
    }

    /// Like `wait`, giving up after `timeout` with `None`
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(value) => Some(Ok(value)),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => Some(Err(Error::TaskAborted)),
        }
    }
}

#[cfg(test)]
#[path = "thread_pool_tests.rs"]
mod tests;
