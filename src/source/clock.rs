//! Wall-clock time sources and epoch conversion

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

/// The number of 100-nanosecond intervals between the Gregorian epoch (1582-10-15T00:00:00Z)
/// and the Unix epoch (1970-01-01T00:00:00Z).
pub const GREGORIAN_OFFSET: u64 = 122_192_928_000_000_000;

/// A trait that defines the wall-clock interface consumed by the time-based generators.
pub trait ClockSource {
    /// Returns the current time as the duration elapsed since the Unix epoch.
    fn unix_time(&mut self) -> Duration;
}

/// The system clock.
///
/// A system clock set before 1970 is reported as the Unix epoch itself.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn unix_time(&mut self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|err| {
                warn!(behind = ?err.duration(), "system clock is set before the Unix epoch");
                Duration::ZERO
            })
    }
}

/// A clock that reports a caller-controlled time.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use uuid9562::source::{ClockSource, FixedClock};
///
/// let mut clock = FixedClock::new(Duration::from_secs(1_645_557_742));
/// clock.advance(Duration::from_millis(1));
/// assert_eq!(clock.unix_time(), Duration::from_millis(1_645_557_742_001));
/// ```
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct FixedClock(Duration);

impl FixedClock {
    /// Creates a clock that reports `unix_time` until changed.
    pub const fn new(unix_time: Duration) -> Self {
        Self(unix_time)
    }

    /// Moves the clock to `unix_time`, which may be in the past.
    pub fn set(&mut self, unix_time: Duration) {
        self.0 = unix_time;
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.0 += delta;
    }
}

impl ClockSource for FixedClock {
    fn unix_time(&mut self) -> Duration {
        self.0
    }
}

/// Converts a duration since the Unix epoch into 100-nanosecond intervals since the Gregorian
/// epoch. Precision below 100 nanoseconds is truncated, and values past `u64::MAX` wrap.
pub fn gregorian_intervals(unix_time: Duration) -> u64 {
    GREGORIAN_OFFSET.wrapping_add((unix_time.as_nanos() / 100) as u64)
}

/// Converts a duration since the Unix epoch into whole milliseconds.
pub fn unix_millis(unix_time: Duration) -> u64 {
    unix_time.as_millis() as u64
}
