//! Platform capabilities used by the worker pool
//!
//! Thread priority and core-count queries go through the `Platform` trait so
//! pool sizing and worker setup stay platform-neutral and can be driven by
//! fakes in tests.

use std::thread;

/// Scheduling priority requested for worker threads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThreadPriority {
    /// Background work that should never compete with the render thread
    Lowest,
    /// Below-normal priority
    Low,
    /// Inherit the default scheduling class
    #[default]
    Normal,
}

impl ThreadPriority {
    /// Parse a priority name as used in configuration (`lowest`, `low`, `normal`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lowest" => Some(ThreadPriority::Lowest),
            "low" => Some(ThreadPriority::Low),
            "normal" => Some(ThreadPriority::Normal),
            _ => None,
        }
    }
}

/// Host platform queries
pub trait Platform: Send + Sync {
    /// Number of hardware threads available to the process (at least 1)
    fn core_count(&self) -> u32;

    /// Apply `priority` to the calling thread
    ///
    /// Returns `true` if the priority is in effect after the call.
    fn set_thread_priority(&self, priority: ThreadPriority) -> bool;
}

/// Platform implementation backed by the standard library
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn core_count(&self) -> u32 {
        thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(1)
    }

    fn set_thread_priority(&self, priority: ThreadPriority) -> bool {
        // std offers no portable priority control; threads start at Normal
        priority == ThreadPriority::Normal
    }
}
