use crate::domain::error::McuxeqError;
use std::io::{self, Stdout, Write};

/// Console output writer
///
/// Response lines go to stdout as raw bytes. Every flush reaches the
/// terminal or pipe immediately so lines show up as the device sends them.
pub struct ConsoleWriter {
    stdout: Stdout,
}

impl ConsoleWriter {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.stdout.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.lock().flush()
    }
}

/// Render a fatal error and its causes for stderr
pub fn format_error(err: &anyhow::Error) -> String {
    let mut message = format!("Error: {}", err);
    for cause in err.chain().skip(1) {
        message.push_str(&format!("\n  caused by: {}", cause));
    }
    if let Some(hint) = err.downcast_ref::<McuxeqError>().and_then(hint_for) {
        message.push_str(&format!("\n  hint: {}", hint));
    }
    message
}

fn hint_for(err: &McuxeqError) -> Option<&'static str> {
    match err {
        McuxeqError::Busy { .. } => Some("another process holds the device, try --force"),
        McuxeqError::EchoNotFound => Some("check that the device echoes its input"),
        McuxeqError::ResponseTooLong(_) | McuxeqError::IdleTimeout(_) => {
            Some("check the --prompt regex or raise --timeout")
        }
        _ => None,
    }
}

/// Print a fatal error to stderr
pub fn write_error(err: &anyhow::Error) {
    let _ = writeln!(io::stderr().lock(), "{}", format_error(err));
}
