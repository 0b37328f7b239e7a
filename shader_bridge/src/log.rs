//! Logging system for shader_bridge
//!
//! This module provides a flexible logging system with:
//! - Customizable sinks via the Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default, plain-text file output on request
//! - An injected `Log` handle instead of a process-wide logger
//! - File and line information for detailed ERROR logs

use colored::*;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::error::{Error, Result};

/// Logger trait for custom logging implementations
///
/// Implement this trait to create custom sinks (network logging, test capture, etc.)
///
/// # Example
///
/// ```no_run
/// use shader_bridge::bridge::log::{Logger, LogEntry};
///
/// struct CountingLogger {
///     count: std::sync::atomic::AtomicUsize,
/// }
///
/// impl Logger for CountingLogger {
///     fn log(&self, _entry: &LogEntry) {
///         self.count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    ///
    /// # Arguments
    ///
    /// * `entry` - The log entry to process
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "bridge::pool", "bridge::vulkan")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    /// Very verbose debug information
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (with file:line details)
    Error,
}

impl LogSeverity {
    /// Parse a level name as used in configuration (`trace`, `debug`, `info`, `warn`, `error`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "trace" => Some(LogSeverity::Trace),
            "debug" => Some(LogSeverity::Debug),
            "info" => Some(LogSeverity::Info),
            "warn" => Some(LogSeverity::Warn),
            "error" => Some(LogSeverity::Error),
            _ => None,
        }
    }

    /// Fixed-width line prefix used by plain-text sinks
    pub fn prefix(self) -> &'static str {
        match self {
            LogSeverity::Trace => "trace: ",
            LogSeverity::Debug => "debug: ",
            LogSeverity::Info => "info:  ",
            LogSeverity::Warn => "warn:  ",
            LogSeverity::Error => "err:   ",
        }
    }
}

/// Default logger implementation using colored console output on stderr
///
/// Colors:
/// - Trace: bright_black
/// - Debug: Cyan
/// - Info: Green
/// - Warn: Yellow
/// - Error: red + bold
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        // Format timestamp as YYYY-MM-DD HH:MM:SS.mmm
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            eprintln!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            eprintln!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

/// Plain-text file sink
///
/// Every line of a multi-line message is written on its own line with the
/// severity prefix, so the file stays grep-friendly.
pub struct FileLogger {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileLogger {
    /// Create (or truncate) the log file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| {
            Error::InitializationFailed(format!("cannot open log file {}: {}", path.display(), e))
        })?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Logger for FileLogger {
    fn log(&self, entry: &LogEntry) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };

        let prefix = entry.severity.prefix();
        for line in entry.message.lines() {
            // A failing log sink must never take the caller down with it
            let _ = writeln!(writer, "{}{}", prefix, line);
        }
        let _ = writer.flush();
    }
}

/// Fans one entry out to several sinks
pub struct MultiLogger {
    sinks: Vec<Arc<dyn Logger>>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<Arc<dyn Logger>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Logger for MultiLogger {
    fn log(&self, entry: &LogEntry) {
        for sink in &self.sinks {
            sink.log(entry);
        }
    }
}

// ===== CONFIGURATION =====

/// An output target for log entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Colored console output (DefaultLogger)
    Stderr,
    /// Plain-text file output (FileLogger)
    File(PathBuf),
}

/// Logging configuration: minimum severity plus the set of output targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Entries below this severity are dropped. `None` disables logging entirely.
    pub min_severity: Option<LogSeverity>,
    /// Sinks that receive every accepted entry
    pub targets: Vec<LogTarget>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            min_severity: Some(LogSeverity::Info),
            targets: vec![LogTarget::Stderr],
        }
    }
}

// ===== LOG HANDLE =====

/// Logging capability injected into every component that emits diagnostics
///
/// Cheap to clone; all clones share the same sinks.
#[derive(Clone)]
pub struct Log {
    logger: Arc<dyn Logger>,
    min_severity: Option<LogSeverity>,
}

impl Log {
    /// Wrap a single sink, accepting entries at or above `min_severity`
    pub fn new<L: Logger + 'static>(logger: L, min_severity: LogSeverity) -> Self {
        Self {
            logger: Arc::new(logger),
            min_severity: Some(min_severity),
        }
    }

    /// Wrap an already shared sink
    pub fn from_shared(logger: Arc<dyn Logger>, min_severity: Option<LogSeverity>) -> Self {
        Self { logger, min_severity }
    }

    /// A handle that drops everything
    pub fn disabled() -> Self {
        Self {
            logger: Arc::new(MultiLogger::new(Vec::new())),
            min_severity: None,
        }
    }

    /// Build the sinks described by `config`
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if a file target cannot be opened.
    pub fn from_config(config: &LogConfig) -> Result<Self> {
        let Some(min_severity) = config.min_severity else {
            return Ok(Self::disabled());
        };

        let mut sinks: Vec<Arc<dyn Logger>> = Vec::with_capacity(config.targets.len());
        for target in &config.targets {
            match target {
                LogTarget::Stderr => sinks.push(Arc::new(DefaultLogger)),
                LogTarget::File(path) => sinks.push(Arc::new(FileLogger::create(path)?)),
            }
        }

        let logger: Arc<dyn Logger> = if sinks.len() == 1 {
            sinks.remove(0)
        } else {
            Arc::new(MultiLogger::new(sinks))
        };

        Ok(Self::from_shared(logger, Some(min_severity)))
    }

    /// Minimum accepted severity (`None` when disabled)
    pub fn min_severity(&self) -> Option<LogSeverity> {
        self.min_severity
    }

    /// Whether an entry of `severity` would reach the sinks
    pub fn enabled(&self, severity: LogSeverity) -> bool {
        matches!(self.min_severity, Some(min) if severity >= min)
    }

    /// Logging method for simple logs without file:line
    ///
    /// Used by macros like bridge_info!, bridge_warn!, etc.
    pub fn log(&self, severity: LogSeverity, source: &str, message: String) {
        if !self.enabled(severity) {
            return;
        }
        self.logger.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Logging method with file:line information (for ERROR logs)
    ///
    /// Used by bridge_error! and bridge_err! to include source location.
    pub fn log_detailed(
        &self,
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if !self.enabled(severity) {
            return;
        }
        self.logger.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new(DefaultLogger, LogSeverity::Info)
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("min_severity", &self.min_severity)
            .finish_non_exhaustive()
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose)
///
/// # Example
///
/// ```no_run
/// # use shader_bridge::bridge_trace;
/// # let log = shader_bridge::bridge::log::Log::disabled();
/// bridge_trace!(log, "bridge::spirv", "Scanning {} words", 128);
/// ```
#[macro_export]
macro_rules! bridge_trace {
    ($log:expr, $source:expr, $($arg:tt)*) => {{
        let log: &$crate::bridge::log::Log = &$log;
        if log.enabled($crate::bridge::log::LogSeverity::Trace) {
            log.log($crate::bridge::log::LogSeverity::Trace, $source, format!($($arg)*));
        }
    }};
}

/// Log a DEBUG message (development information)
#[macro_export]
macro_rules! bridge_debug {
    ($log:expr, $source:expr, $($arg:tt)*) => {{
        let log: &$crate::bridge::log::Log = &$log;
        if log.enabled($crate::bridge::log::LogSeverity::Debug) {
            log.log($crate::bridge::log::LogSeverity::Debug, $source, format!($($arg)*));
        }
    }};
}

/// Log an INFO message (important events)
#[macro_export]
macro_rules! bridge_info {
    ($log:expr, $source:expr, $($arg:tt)*) => {{
        let log: &$crate::bridge::log::Log = &$log;
        if log.enabled($crate::bridge::log::LogSeverity::Info) {
            log.log($crate::bridge::log::LogSeverity::Info, $source, format!($($arg)*));
        }
    }};
}

/// Log a WARN message (potential issues)
#[macro_export]
macro_rules! bridge_warn {
    ($log:expr, $source:expr, $($arg:tt)*) => {{
        let log: &$crate::bridge::log::Log = &$log;
        if log.enabled($crate::bridge::log::LogSeverity::Warn) {
            log.log($crate::bridge::log::LogSeverity::Warn, $source, format!($($arg)*));
        }
    }};
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! bridge_error {
    ($log:expr, $source:expr, $($arg:tt)*) => {{
        let log: &$crate::bridge::log::Log = &$log;
        if log.enabled($crate::bridge::log::LogSeverity::Error) {
            log.log_detailed(
                $crate::bridge::log::LogSeverity::Error,
                $source,
                format!($($arg)*),
                file!(),
                line!(),
            );
        }
    }};
}

/// Log an ERROR message and evaluate to the matching `Error::BackendError`
///
/// Intended for `map_err`:
///
/// ```ignore
/// device.create_render_pass(&info, None)
///     .map_err(|e| bridge_err!(log, "bridge::vulkan", "Failed to create render pass: {:?}", e))?;
/// ```
#[macro_export]
macro_rules! bridge_err {
    ($log:expr, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::bridge_error!($log, $source, "{}", message);
        $crate::bridge::Error::BackendError(message)
    }};
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
