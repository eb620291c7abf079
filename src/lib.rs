//! mcuxeq Library
//!
//! Sends one command to a microcontroller shell over a serial device,
//! waits for the echo and collects the response up to the next prompt.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use core::session::{run_command, CommandSession, SessionState};
pub use domain::command::Command;
pub use domain::config::{FileConfig, SessionConfig};
pub use domain::error::{ErrorCategory, McuxeqError, McuxeqResult};
pub use infrastructure::serial::{RetryPolicy, SerialPort, TransportOpener};
