use crate::domain::error::McuxeqResult;
use rustix::event::{poll, PollFd, PollFlags};
use rustix::fs::{flock, FlockOperation};
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Byte stream with a bounded wait for input
pub trait Port: Read + Write {
    /// Block until input is available or `timeout` elapses.
    ///
    /// Returns `Ok(false)` on timeout. `None` waits forever.
    fn wait_readable(&mut self, timeout: Option<Duration>) -> io::Result<bool>;
}

/// Wait for `fd` to become readable with `poll(2)`
pub fn wait_fd_readable(fd: BorrowedFd<'_>, timeout: Option<Duration>) -> io::Result<bool> {
    let timeout_ms = match timeout {
        Some(t) => i32::try_from(t.as_millis()).unwrap_or(i32::MAX),
        None => -1,
    };
    let mut fds = [PollFd::new(&fd, PollFlags::IN)];
    let ready = poll(&mut fds, timeout_ms)?;
    debug!("poll() returned {} revents {:?}", ready, fds[0].revents());
    Ok(ready > 0)
}

/// An opened, locked and configured serial device
pub struct SerialPort {
    file: File,
    path: PathBuf,
    locked: bool,
}

impl SerialPort {
    pub(crate) fn new(file: File, path: &Path, locked: bool) -> Self {
        Self {
            file,
            path: path.to_path_buf(),
            locked,
        }
    }

    /// Device path this port was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this port holds the advisory lock
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Release the advisory lock and close the device
    pub fn close(self) -> McuxeqResult<()> {
        if self.locked {
            if let Err(e) = flock(&self.file, FlockOperation::Unlock) {
                warn!("Failed to unlock {}: {}", self.path.display(), e);
            }
        }
        debug!("Closed {}", self.path.display());
        Ok(())
    }
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("path", &self.path)
            .field("locked", &self.locked)
            .finish()
    }
}

impl AsFd for SerialPort {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Port for SerialPort {
    fn wait_readable(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        wait_fd_readable(self.file.as_fd(), timeout)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedPort;
    use super::*;

    #[test]
    fn test_scripted_port_splits_large_chunks() {
        let mut port = ScriptedPort::new([b"abcdef".as_slice()]);
        let mut buf = [0u8; 4];
        assert!(port.wait_readable(None).unwrap());
        assert_eq!(port.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(port.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
        assert!(!port.wait_readable(Some(Duration::from_millis(1))).unwrap());
    }

    #[test]
    fn test_wait_fd_readable_times_out() {
        let (reader, _writer) = std::os::unix::net::UnixStream::pair().unwrap();
        let ready = wait_fd_readable(reader.as_fd(), Some(Duration::from_millis(20))).unwrap();
        assert!(!ready);
    }

    #[test]
    fn test_wait_fd_readable_sees_data() {
        let (reader, mut writer) = std::os::unix::net::UnixStream::pair().unwrap();
        writer.write_all(b"x").unwrap();
        let ready = wait_fd_readable(reader.as_fd(), Some(Duration::from_millis(500))).unwrap();
        assert!(ready);
    }
}
