use std::time::{Duration, Instant};

/// Absolute time bound for one phase
///
/// A deadline without a bound never expires. Expiry is strict: reaching the
/// bound exactly is not a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Start a new phase of length `timeout` from now
    pub fn after(timeout: Option<Duration>) -> Self {
        Self::starting_at(Instant::now(), timeout)
    }

    /// Start a new phase of length `timeout` from `start`
    pub fn starting_at(start: Instant, timeout: Option<Duration>) -> Self {
        Self {
            at: timeout.and_then(|t| start.checked_add(t)),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Whether `now` lies strictly past the bound
    pub fn is_expired_at(&self, now: Instant) -> bool {
        matches!(self.at, Some(at) if now > at)
    }
}
