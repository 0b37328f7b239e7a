//! Unit tests for thread_pool.rs

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use crate::config::BridgeConfig;
use crate::error::Error;
use crate::log::{Log, LogEntry, LogSeverity, Logger};
use crate::platform::{Platform, ThreadPriority};
use crate::pool::{default_worker_count, ThreadPool};

// ============================================================================
// TEST HELPERS
// ============================================================================

struct FakePlatform {
    cores: u32,
    applies_priority: bool,
    priority_calls: AtomicU32,
    last_priority: Mutex<Option<ThreadPriority>>,
}

impl FakePlatform {
    fn new(cores: u32, applies_priority: bool) -> Arc<Self> {
        Arc::new(Self {
            cores,
            applies_priority,
            priority_calls: AtomicU32::new(0),
            last_priority: Mutex::new(None),
        })
    }
}

impl Platform for FakePlatform {
    fn core_count(&self) -> u32 {
        self.cores
    }

    fn set_thread_priority(&self, priority: ThreadPriority) -> bool {
        self.priority_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_priority.lock().unwrap() = Some(priority);
        self.applies_priority
    }
}

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn capture_log(min: LogSeverity) -> (Log, Arc<Mutex<Vec<LogEntry>>>) {
    let entries = Arc::new(Mutex::new(Vec::new()));
    let log = Log::new(CaptureLogger { entries: entries.clone() }, min);
    (log, entries)
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..500 {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

// ============================================================================
// WORKER COUNT
// ============================================================================

#[test]
fn test_default_worker_count() {
    assert_eq!(default_worker_count(0), 1);
    assert_eq!(default_worker_count(1), 1);
    assert_eq!(default_worker_count(2), 1);
    assert_eq!(default_worker_count(8), 5);
    assert_eq!(default_worker_count(16), 10);
    assert_eq!(default_worker_count(64), 32);
    assert_eq!(default_worker_count(256), 32);
}

#[test]
fn test_explicit_count_overrides_platform() {
    let pool = ThreadPool::new(3, ThreadPriority::Normal, FakePlatform::new(64, true), Log::disabled()).unwrap();
    assert_eq!(pool.worker_count(), 3);
}

#[test]
fn test_zero_count_uses_core_count() {
    let pool = ThreadPool::new(0, ThreadPriority::Normal, FakePlatform::new(8, true), Log::disabled()).unwrap();
    assert_eq!(pool.worker_count(), 5);
}

#[test]
fn test_from_config() {
    let config = BridgeConfig {
        num_compiler_threads: 2,
        compiler_priority: ThreadPriority::Lowest,
        ..Default::default()
    };
    let platform = FakePlatform::new(4, true);
    let pool = ThreadPool::from_config(&config, platform.clone(), Log::disabled()).unwrap();
    assert_eq!(pool.worker_count(), 2);

    assert!(wait_until(|| platform.priority_calls.load(Ordering::SeqCst) == 2));
    assert_eq!(*platform.last_priority.lock().unwrap(), Some(ThreadPriority::Lowest));
}

#[test]
fn test_creation_logs_worker_count() {
    let (log, entries) = capture_log(LogSeverity::Info);
    let _pool = ThreadPool::new(2, ThreadPriority::Normal, FakePlatform::new(4, true), log).unwrap();

    let entries = entries.lock().unwrap();
    assert!(entries
        .iter()
        .any(|e| e.severity == LogSeverity::Info && e.message == "Using 2 compiler threads"));
}

#[test]
fn test_priority_rejection_logged_at_debug() {
    let (log, entries) = capture_log(LogSeverity::Debug);
    let pool = ThreadPool::new(1, ThreadPriority::Low, FakePlatform::new(4, false), log).unwrap();
    pool.submit(|| ()).unwrap().wait().unwrap();

    let entries = entries.lock().unwrap();
    assert!(entries
        .iter()
        .any(|e| e.severity == LogSeverity::Debug && e.message.contains("not applied")));
}

// ============================================================================
// TASK EXECUTION
// ============================================================================

#[test]
fn test_every_enqueued_task_runs_once() {
    let pool = ThreadPool::new(4, ThreadPriority::Normal, FakePlatform::new(8, true), Log::disabled()).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..200 {
        let counter = Arc::clone(&counter);
        pool.enqueue(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    assert!(wait_until(|| counter.load(Ordering::SeqCst) == 200));
    thread::sleep(Duration::from_millis(20));
    assert_eq!(counter.load(Ordering::SeqCst), 200);
}

#[test]
fn test_submit_returns_result() {
    let pool = ThreadPool::new(2, ThreadPriority::Normal, FakePlatform::new(4, true), Log::disabled()).unwrap();

    let handles: Vec<_> = (0..10u32).map(|i| pool.submit(move || i * i).unwrap()).collect();
    let results: Vec<u32> = handles.into_iter().map(|h| h.wait().unwrap()).collect();
    assert_eq!(results, (0..10u32).map(|i| i * i).collect::<Vec<_>>());
}

#[test]
fn test_single_worker_runs_in_fifo_order() {
    let pool = ThreadPool::new(1, ThreadPriority::Normal, FakePlatform::new(1, true), Log::disabled()).unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut last = None;
    for i in 0..16 {
        let order = Arc::clone(&order);
        last = Some(pool.submit(move || order.lock().unwrap().push(i)).unwrap());
    }
    last.unwrap().wait().unwrap();

    assert_eq!(*order.lock().unwrap(), (0..16).collect::<Vec<_>>());
}

#[test]
fn test_try_wait_and_timeout() {
    let pool = ThreadPool::new(1, ThreadPriority::Normal, FakePlatform::new(2, true), Log::disabled()).unwrap();
    let gate = Arc::new(Barrier::new(2));

    let task_gate = Arc::clone(&gate);
    let handle = pool
        .submit(move || {
            task_gate.wait();
            7
        })
        .unwrap();

    assert!(handle.try_wait().is_none());
    assert!(handle.wait_timeout(Duration::from_millis(10)).is_none());

    gate.wait();
    assert_eq!(handle.wait_timeout(Duration::from_secs(5)).unwrap().unwrap(), 7);
}

#[test]
fn test_panicking_task_keeps_worker_alive() {
    let (log, entries) = capture_log(LogSeverity::Error);
    let pool = ThreadPool::new(1, ThreadPriority::Normal, FakePlatform::new(2, true), log).unwrap();

    let failed = pool.submit(|| -> u32 { panic!("task failure") }).unwrap();
    assert!(matches!(failed.wait(), Err(Error::TaskAborted)));

    let ok = pool.submit(|| 5u32).unwrap();
    assert_eq!(ok.wait().unwrap(), 5);

    assert!(entries
        .lock()
        .unwrap()
        .iter()
        .any(|e| e.severity == LogSeverity::Error && e.message.contains("panicked")));
}

// ============================================================================
// BUSY COUNT
// ============================================================================

#[test]
fn test_running_drops_to_zero_when_idle() {
    let pool = ThreadPool::new(3, ThreadPriority::Normal, FakePlatform::new(4, true), Log::disabled()).unwrap();
    assert!(pool.running() <= pool.worker_count());
    assert!(wait_until(|| pool.running() == 0));
}

#[test]
fn test_running_counts_blocked_tasks() {
    let pool = ThreadPool::new(2, ThreadPriority::Normal, FakePlatform::new(4, true), Log::disabled()).unwrap();
    assert!(wait_until(|| pool.running() == 0));

    let gate = Arc::new(Barrier::new(3));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let gate = Arc::clone(&gate);
            pool.submit(move || {
                gate.wait();
            })
            .unwrap()
        })
        .collect();

    assert!(wait_until(|| pool.running() == 2));
    assert!(pool.running() <= pool.worker_count());

    gate.wait();
    for handle in handles {
        handle.wait().unwrap();
    }
    assert!(wait_until(|| pool.running() == 0));
}

// ============================================================================
// SHUTDOWN
// ============================================================================

#[test]
fn test_enqueue_after_shutdown_fails() {
    let pool = ThreadPool::new(2, ThreadPriority::Normal, FakePlatform::new(4, true), Log::disabled()).unwrap();
    pool.shutdown();

    assert!(pool.is_stopped());
    assert!(matches!(pool.enqueue(|| ()), Err(Error::PoolStopped)));
    assert!(matches!(pool.submit(|| 1), Err(Error::PoolStopped)));
}

#[test]
fn test_shutdown_is_idempotent() {
    let pool = ThreadPool::new(2, ThreadPriority::Normal, FakePlatform::new(4, true), Log::disabled()).unwrap();
    pool.shutdown();
    pool.shutdown();
    assert_eq!(pool.running(), 0);
}

#[test]
fn test_shutdown_finishes_running_task_and_drops_queued() {
    let pool = ThreadPool::new(1, ThreadPriority::Normal, FakePlatform::new(2, true), Log::disabled()).unwrap();
    let started = Arc::new(Barrier::new(2));

    let task_started = Arc::clone(&started);
    let running = pool
        .submit(move || {
            task_started.wait();
            thread::sleep(Duration::from_millis(50));
            1
        })
        .unwrap();

    started.wait();
    let queued = pool.submit(|| 2).unwrap();
    pool.shutdown();

    assert_eq!(running.wait().unwrap(), 1);
    assert!(matches!(queued.wait(), Err(Error::TaskAborted)));
    assert_eq!(pool.pending(), 0);
}

#[test]
fn test_drop_joins_workers() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let pool = ThreadPool::new(2, ThreadPriority::Normal, FakePlatform::new(4, true), Log::disabled()).unwrap();
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap()
        .wait()
        .unwrap();
    }
    // One reference left: every worker closure has been dropped
    assert_eq!(Arc::strong_count(&counter), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
