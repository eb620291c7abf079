use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// mcuxeq unified error type
///
/// Every variant is terminal for the session. Only [`McuxeqError::Busy`] is
/// ever retried, and only inside the opener's retry loop.
#[derive(Error, Debug)]
pub enum McuxeqError {
    #[error("Device {path} is busy: {source}")]
    Busy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to drop elevated privileges: {0}")]
    Privilege(#[source] io::Error),

    #[error("Failed to put terminal in exclusive mode: {0}")]
    Exclusive(#[source] io::Error),

    #[error("Failed to enable raw mode: {0}")]
    RawMode(#[source] io::Error),

    #[error("Failed to flush: {0}")]
    Flush(#[source] io::Error),

    #[error("Write error: {0}")]
    Write(#[source] io::Error),

    #[error("Short write {written} < {expected}")]
    ShortWrite { written: usize, expected: usize },

    #[error("Poll error: {0}")]
    Poll(#[source] io::Error),

    #[error("Read error: {0}")]
    Read(#[source] io::Error),

    #[error("No data")]
    EndOfStream,

    #[error("Timeout: no data received within {}ms", .0.as_millis())]
    IdleTimeout(Duration),

    #[error("Command echo not found")]
    EchoNotFound,

    #[error("Command echo not found within {}ms", .0.as_millis())]
    EchoTimeout(Duration),

    #[error("Response too long: no prompt within {}ms", .0.as_millis())]
    ResponseTooLong(Duration),

    #[error("Line too long (limit {limit} bytes)")]
    LineTooLong { limit: usize },

    #[error("Failed to compile prompt regex: {0}")]
    Prompt(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output error: {0}")]
    Output(#[source] io::Error),
}

/// Failure classes a caller can act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Open/lock contention with another process
    TransientBusy,
    /// Idle read timeout or a phase deadline
    Timeout,
    /// Device did not follow the echo/prompt protocol
    Protocol,
    /// Device or stream I/O failure
    Transport,
    /// Bad inputs
    Config,
}

impl McuxeqError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            McuxeqError::Busy { .. } => ErrorCategory::TransientBusy,
            McuxeqError::IdleTimeout(_)
            | McuxeqError::EchoTimeout(_)
            | McuxeqError::ResponseTooLong(_) => ErrorCategory::Timeout,
            McuxeqError::EchoNotFound | McuxeqError::LineTooLong { .. } => {
                ErrorCategory::Protocol
            }
            McuxeqError::Prompt(_) | McuxeqError::Config { .. } => ErrorCategory::Config,
            McuxeqError::Open { .. }
            | McuxeqError::Privilege(_)
            | McuxeqError::Exclusive(_)
            | McuxeqError::RawMode(_)
            | McuxeqError::Flush(_)
            | McuxeqError::Write(_)
            | McuxeqError::ShortWrite { .. }
            | McuxeqError::Poll(_)
            | McuxeqError::Read(_)
            | McuxeqError::EndOfStream
            | McuxeqError::Output(_) => ErrorCategory::Transport,
        }
    }

    /// Whether the opener may retry after this error
    pub fn is_transient(&self) -> bool {
        self.category() == ErrorCategory::TransientBusy
    }
}

pub type McuxeqResult<T> = Result<T, McuxeqError>;
