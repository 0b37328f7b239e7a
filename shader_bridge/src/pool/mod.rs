/// Pool module - worker threads for asynchronous specialization

pub mod thread_pool;

pub use thread_pool::{default_worker_count, TaskHandle, ThreadPool, MAX_DEFAULT_WORKERS};
