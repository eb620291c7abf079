use crate::domain::error::{McuxeqError, McuxeqResult};
use crate::infrastructure::logging::hex_dump;
use crate::infrastructure::serial::Port;
use std::io::ErrorKind;
use std::time::Duration;
use tracing::{trace, Level};

/// Bytes fetched from the port per refill
pub const CHUNK_SIZE: usize = 64;

/// Serves a port's input one byte at a time
///
/// Each refill waits at most `idle_timeout` for the port to become readable,
/// then reads up to [`CHUNK_SIZE`] bytes. Bytes come out exactly in arrival
/// order.
pub struct ByteSource<P> {
    port: P,
    buf: [u8; CHUNK_SIZE],
    len: usize,
    pos: usize,
    idle_timeout: Option<Duration>,
}

impl<P: Port> ByteSource<P> {
    pub fn new(port: P, idle_timeout: Option<Duration>) -> Self {
        Self {
            port,
            buf: [0; CHUNK_SIZE],
            len: 0,
            pos: 0,
            idle_timeout,
        }
    }

    /// Next byte, blocking up to the idle timeout when the buffer is empty
    pub fn next_byte(&mut self) -> McuxeqResult<u8> {
        if self.pos >= self.len {
            self.refill()?;
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Bytes received but not yet served
    pub fn buffered(&self) -> &[u8] {
        &self.buf[self.pos..self.len]
    }

    fn refill(&mut self) -> McuxeqResult<()> {
        let ready = self
            .port
            .wait_readable(self.idle_timeout)
            .map_err(McuxeqError::Poll)?;
        if !ready {
            return Err(McuxeqError::IdleTimeout(self.idle_timeout.unwrap_or_default()));
        }

        let n = loop {
            match self.port.read(&mut self.buf) {
                Ok(0) => return Err(McuxeqError::EndOfStream),
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(McuxeqError::Read(e)),
            }
        };
        self.len = n;
        self.pos = 0;

        trace!("Read {} bytes", n);
        if tracing::enabled!(Level::TRACE) {
            for row in hex_dump(&self.buf[..n]) {
                trace!("{}", row);
            }
        }
        Ok(())
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }
}
