use rustix::termios::{
    ioctl_tiocexcl, tcflush, tcgetattr, tcsetattr, OptionalActions, QueueSelector,
};
use std::io;
use std::os::fd::BorrowedFd;
use tracing::debug;

/// Platform hooks the opener needs beyond a plain `open(2)`
pub trait TransportControl {
    /// Give up any privilege that would bypass kernel exclusive mode
    fn drop_elevated_privilege(&self) -> io::Result<()>;

    /// Refuse further opens of the device by other processes
    fn set_exclusive(&self, fd: BorrowedFd<'_>) -> io::Result<()>;

    /// Disable line editing, echo and signal characters
    fn set_raw_mode(&self, fd: BorrowedFd<'_>) -> io::Result<()>;

    /// Throw away pending input and output
    fn discard_pending(&self, fd: BorrowedFd<'_>) -> io::Result<()>;
}

/// termios-based control for Unix terminals
#[derive(Debug, Clone, Copy, Default)]
pub struct TermiosControl;

impl TransportControl for TermiosControl {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn drop_elevated_privilege(&self) -> io::Result<()> {
        use rustix::thread::{capabilities, set_capabilities, CapabilityFlags};

        let mut sets = capabilities(None)?;
        if sets.effective.contains(CapabilityFlags::SYS_ADMIN) {
            sets.effective.remove(CapabilityFlags::SYS_ADMIN);
            set_capabilities(None, sets)?;
            debug!("Dropped CAP_SYS_ADMIN from effective set");
        }
        Ok(())
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn drop_elevated_privilege(&self) -> io::Result<()> {
        Ok(())
    }

    fn set_exclusive(&self, fd: BorrowedFd<'_>) -> io::Result<()> {
        ioctl_tiocexcl(fd)?;
        Ok(())
    }

    fn set_raw_mode(&self, fd: BorrowedFd<'_>) -> io::Result<()> {
        let mut termios = tcgetattr(fd)?;
        termios.make_raw();
        tcsetattr(fd, OptionalActions::Now, &termios)?;
        Ok(())
    }

    fn discard_pending(&self, fd: BorrowedFd<'_>) -> io::Result<()> {
        tcflush(fd, QueueSelector::IOFlush)?;
        Ok(())
    }
}
