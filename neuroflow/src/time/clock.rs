use std::time::{Duration, Instant};

use tai_time::{MonotonicClock, MonotonicTime};

use crate::time::Time;

/// A type that can be used to pace a real-time scheduler.
///
/// A clock measures the time elapsed since its own reference instant.
/// Deadlines are exact durations, while scheduler timestamps are the whole
/// milliseconds returned by [`now()`](Clock::now).
///
/// A clock can be associated to a scheduler at construction time with
/// [`RealTimeSyncScheduler::with_clock()`](crate::scheduler::RealTimeSyncScheduler::with_clock).
pub trait Clock {
    /// Returns the exact time elapsed since the reference instant.
    fn elapsed(&self) -> Duration;

    /// Blocks until the specified time since the reference instant.
    fn synchronize(&mut self, deadline: Duration) -> SyncStatus;

    /// Returns the number of whole milliseconds elapsed since the reference
    /// instant.
    fn now(&self) -> Time {
        to_millis(self.elapsed())
    }
}

/// Truncates a duration to whole milliseconds, saturating at `Time::MAX`.
pub(crate) fn to_millis(duration: Duration) -> Time {
    Time::try_from(duration.as_millis()).unwrap_or(Time::MAX)
}

/// The current synchronization status of a clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyncStatus {
    /// The clock is synchronized.
    Synchronized,
    /// The deadline has already elapsed and lags behind the current clock time
    /// by the duration given in the payload.
    OutOfSync(Duration),
}

/// A real-time [`Clock`] based on the system's monotonic clock.
#[derive(Copy, Clone, Debug)]
pub struct SystemClock(MonotonicClock);

impl SystemClock {
    /// Constructs a `SystemClock` whose reference is the current instant.
    pub fn new() -> Self {
        Self::from_instant(Instant::now())
    }

    /// Constructs a `SystemClock` whose reference is the specified instant.
    ///
    /// The reference instant should not lie in the future, since time
    /// cannot be negative.
    pub fn from_instant(wall_clock_ref: Instant) -> Self {
        Self(MonotonicClock::init_from_instant(
            MonotonicTime::EPOCH,
            wall_clock_ref,
        ))
    }

}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        let now = self.0.now();
        if now <= MonotonicTime::EPOCH {
            return Duration::ZERO;
        }

        now.duration_since(MonotonicTime::EPOCH)
    }

    /// Blocks until the system time reaches the deadline.
    fn synchronize(&mut self, deadline: Duration) -> SyncStatus {
        let now = self.elapsed();
        if now <= deadline {
            spin_sleep::sleep(deadline - now);

            return SyncStatus::Synchronized;
        }

        SyncStatus::OutOfSync(now - deadline)
    }
}
