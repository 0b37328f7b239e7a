//! Error types for shader_bridge
//!
//! This module defines the error types used throughout the crate,
//! including signature decoding, instruction-stream patching, worker pool
//! lifecycle and backend object creation.

use std::fmt;

/// Result type for shader_bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// shader_bridge errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan object creation rejected, etc.)
    BackendError(String),

    /// Out of host or device memory
    OutOfMemory,

    /// Invalid caller-provided resource (code blob, descriptor, etc.)
    InvalidResource(String),

    /// Initialization failed (worker threads, log sinks)
    InitializationFailed(String),

    /// Malformed signature chunk
    DecodeFailed(String),

    /// Instruction stream and shader metadata disagree
    PatchFailed(String),

    /// Work was submitted to a pool that has begun shutting down
    PoolStopped,

    /// A submitted task never produced its result (panicked or dropped unrun)
    TaskAborted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::DecodeFailed(msg) => write!(f, "Decode failed: {}", msg),
            Error::PatchFailed(msg) => write!(f, "Patch failed: {}", msg),
            Error::PoolStopped => write!(f, "Thread pool stopped"),
            Error::TaskAborted => write!(f, "Task aborted before producing a result"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
