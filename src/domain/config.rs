use crate::domain::error::McuxeqResult;
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the default device
pub const DEVICE_ENV: &str = "MCUXEQ_DEV";
/// Environment variable naming the default prompt regex
pub const PROMPT_ENV: &str = "MCUXEQ_PROMPT";

/// Prompt used when none is configured: an optional word followed by
/// one of `#`, `$` or `>` and a single space
pub const DEFAULT_PROMPT: &str = "^[[:alnum:]]*[#$>] $";
/// Timeout used when none is configured
pub const DEFAULT_TIMEOUT_MS: i64 = 2000;

/// Resolved inputs for one command/response exchange
///
/// Built once at startup and shared by reference with every component.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Serial device path
    pub device: PathBuf,
    /// Compiled prompt matcher
    pub prompt: Regex,
    /// Idle timeout and phase budget; `None` waits forever
    pub timeout: Option<Duration>,
    /// Open the device even when another process holds it
    pub force: bool,
    /// Debug verbosity (0 = quiet)
    pub debug_level: u8,
}

impl SessionConfig {
    /// Build a configuration, compiling `prompt` into a byte regex
    pub fn new(
        device: impl Into<PathBuf>,
        prompt: &str,
        timeout_ms: i64,
        force: bool,
        debug_level: u8,
    ) -> McuxeqResult<Self> {
        Ok(Self {
            device: device.into(),
            prompt: Regex::new(prompt)?,
            timeout: timeout_from_ms(timeout_ms),
            force,
            debug_level,
        })
    }
}

/// Convert a millisecond count to a timeout; zero or negative disables it
pub fn timeout_from_ms(timeout_ms: i64) -> Option<Duration> {
    u64::try_from(timeout_ms)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

/// Settings read from the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Default serial device
    #[serde(default)]
    pub device: Option<PathBuf>,
    /// Default prompt regex
    #[serde(default)]
    pub prompt: Option<String>,
    /// Default timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<i64>,
}
