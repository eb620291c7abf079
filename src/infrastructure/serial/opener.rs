use crate::core::deadline::Deadline;
use crate::domain::error::{McuxeqError, McuxeqResult};
use crate::infrastructure::serial::control::{TermiosControl, TransportControl};
use crate::infrastructure::serial::port::SerialPort;
use rustix::fs::{flock, open, FlockOperation, Mode, OFlags};
use rustix::io::Errno;
use std::fs::File;
use std::io;
use std::os::fd::AsFd;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Bounded retry for transient open failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Sleep between attempts
    pub interval: Duration,
    /// Total time allowed, measured from the first attempt; `None` retries forever
    pub timeout: Option<Duration>,
}

impl RetryPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            timeout,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run `attempt` until it succeeds, fails permanently or the deadline passes
    pub fn run<T>(&self, mut attempt: impl FnMut() -> McuxeqResult<T>) -> McuxeqResult<T> {
        let deadline = Deadline::after(self.timeout);
        loop {
            match attempt() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && !deadline.is_expired() => {
                    debug!("{}, retrying", e);
                    thread::sleep(self.interval);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Acquires exclusive access to a serial device and puts it in raw mode
///
/// Cooperating instances serialize on an advisory `flock`; everyone else is
/// kept out by the kernel's exclusive terminal mode. A forced open skips the
/// advisory lock and keeps any privilege that overrides exclusive mode.
#[derive(Debug, Clone)]
pub struct TransportOpener<C = TermiosControl> {
    control: C,
    retry: RetryPolicy,
    force: bool,
}

impl TransportOpener<TermiosControl> {
    pub fn new(retry: RetryPolicy, force: bool) -> Self {
        Self::with_control(TermiosControl, retry, force)
    }
}

impl<C: TransportControl> TransportOpener<C> {
    pub fn with_control(control: C, retry: RetryPolicy, force: bool) -> Self {
        Self {
            control,
            retry,
            force,
        }
    }

    /// Open `path`, waiting out other holders within the retry policy
    pub fn open(&self, path: &Path) -> McuxeqResult<SerialPort> {
        if !self.force {
            self.control
                .drop_elevated_privilege()
                .map_err(McuxeqError::Privilege)?;
        }

        debug!("Opening {}...", path.display());
        let file = self.retry.run(|| self.open_once(path))?;

        self.control
            .set_exclusive(file.as_fd())
            .map_err(McuxeqError::Exclusive)?;
        self.control
            .set_raw_mode(file.as_fd())
            .map_err(McuxeqError::RawMode)?;
        self.control
            .discard_pending(file.as_fd())
            .map_err(McuxeqError::Flush)?;

        info!("Opened {}", path.display());
        Ok(SerialPort::new(file, path, !self.force))
    }

    fn open_once(&self, path: &Path) -> McuxeqResult<File> {
        let fd = open(
            path,
            OFlags::RDWR | OFlags::NOCTTY | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(|e| open_error(path, e))?;
        let file = File::from(fd);

        if !self.force {
            flock(&file, FlockOperation::NonBlockingLockExclusive)
                .map_err(|e| open_error(path, e))?;
        }

        Ok(file)
    }
}

fn open_error(path: &Path, errno: Errno) -> McuxeqError {
    let source = io::Error::from(errno);
    if errno == Errno::BUSY || errno == Errno::AGAIN || errno == Errno::WOULDBLOCK {
        McuxeqError::Busy {
            path: path.to_path_buf(),
            source,
        }
    } else {
        McuxeqError::Open {
            path: path.to_path_buf(),
            source,
        }
    }
}
