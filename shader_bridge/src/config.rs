//! Runtime configuration
//!
//! `BridgeConfig` gathers the knobs that are read once at startup: log level
//! and targets, compiler thread count and compiler thread priority. Values can
//! come from the process environment or from any lookup function.

use std::path::{Path, PathBuf};

use crate::log::{LogConfig, LogSeverity, LogTarget};
use crate::platform::ThreadPriority;

/// Environment variable selecting the minimum log level
pub const ENV_LOG_LEVEL: &str = "SHADER_BRIDGE_LOG_LEVEL";
/// Environment variable selecting the log file directory (`none` disables the file)
pub const ENV_LOG_PATH: &str = "SHADER_BRIDGE_LOG_PATH";
/// Environment variable overriding the number of compiler threads
pub const ENV_NUM_COMPILER_THREADS: &str = "SHADER_BRIDGE_NUM_COMPILER_THREADS";
/// Environment variable selecting compiler thread priority
pub const ENV_COMPILER_PRIORITY: &str = "SHADER_BRIDGE_COMPILER_PRIORITY";

/// Default base name of the log file
pub const DEFAULT_LOG_FILE_NAME: &str = "shader_bridge.log";

/// Configuration for the whole crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Logging configuration
    pub log: LogConfig,
    /// Worker count for the compiler pool (0 = derive from core count)
    pub num_compiler_threads: u32,
    /// Priority requested for compiler worker threads
    pub compiler_priority: ThreadPriority,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            num_compiler_threads: 0,
            compiler_priority: ThreadPriority::Normal,
        }
    }
}

impl BridgeConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(DEFAULT_LOG_FILE_NAME, |name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`
    ///
    /// # Arguments
    ///
    /// * `log_file_name` - Base name of the log file, prefixed with the executable stem
    /// * `lookup` - Returns the value of a variable, or `None` if unset
    pub fn from_vars<F>(log_file_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let min_severity = match lookup(ENV_LOG_LEVEL).as_deref() {
            Some("none") => None,
            Some(name) => Some(LogSeverity::from_name(name).unwrap_or(LogSeverity::Info)),
            None => Some(LogSeverity::Info),
        };

        let mut targets = vec![LogTarget::Stderr];
        if min_severity.is_some() {
            if let Some(dir) = lookup(ENV_LOG_PATH) {
                if !dir.is_empty() && dir != "none" {
                    targets.push(LogTarget::File(log_file_path(Path::new(&dir), log_file_name)));
                }
            }
        }

        let num_compiler_threads = lookup(ENV_NUM_COMPILER_THREADS)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(0);

        let compiler_priority = lookup(ENV_COMPILER_PRIORITY)
            .and_then(|v| ThreadPriority::from_name(&v))
            .unwrap_or_default();

        Self {
            log: LogConfig { min_severity, targets },
            num_compiler_threads,
            compiler_priority,
        }
    }
}

/// `<dir>/<executable stem>_<base_name>`
fn log_file_path(dir: &Path, base_name: &str) -> PathBuf {
    let exe_stem = std::env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "shader_bridge".to_string());

    dir.join(format!("{}_{}", exe_stem, base_name))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
