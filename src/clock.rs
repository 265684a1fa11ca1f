//! Clock capability for the profiler
//!
//! A [`Profiler`](crate::Profiler) never reads time itself; it asks the
//! [`Clock`] it was built with. Anything that can produce a time point whose
//! difference is a duration qualifies:
//!
//! - [`MonotonicClock`]: `std::time::Instant`, for real measurements.
//! - [`TickClock`]: an atomic counter returning `0, 1, 2, ...`, for
//!   deterministic tests and for logical (ordering-only) timestamps.
//!
//! # Example
//!
//! ```
//! use eprofiler::{Clock, TickClock};
//!
//! let clock = TickClock::new();
//! let t1 = clock.now();
//! let t2 = clock.now();
//! assert_eq!(t2 - t1, 1);
//! ```

use std::ops::Sub;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of time points
pub trait Clock {
    /// A point in time; subtracting two of them yields a [`Clock::Duration`]
    type TimePoint: Copy + Sub<Output = Self::Duration>;

    /// Elapsed time between two points; `Default` is the zero duration
    type Duration: Copy + Default;

    /// The current time
    fn now(&self) -> Self::TimePoint;

    /// Time point stored in slots that were never written
    fn origin(&self) -> Self::TimePoint;
}

impl<C: Clock + ?Sized> Clock for &C {
    type TimePoint = C::TimePoint;
    type Duration = C::Duration;

    fn now(&self) -> Self::TimePoint {
        (**self).now()
    }

    fn origin(&self) -> Self::TimePoint {
        (**self).origin()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    type TimePoint = C::TimePoint;
    type Duration = C::Duration;

    fn now(&self) -> Self::TimePoint {
        (**self).now()
    }

    fn origin(&self) -> Self::TimePoint {
        (**self).origin()
    }
}

/// Monotonic wall-clock time
///
/// The origin is the instant the clock was created. `Instant` subtraction
/// saturates, so an event recorded before its reference reads as a zero
/// duration rather than a negative one.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }

    /// Time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    type TimePoint = Instant;
    type Duration = Duration;

    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn origin(&self) -> Instant {
        self.origin
    }
}

/// Deterministic counter clock
///
/// Every call to [`Clock::now`] returns the current counter value and then
/// advances it by the step (1 by default). Time points and durations are
/// signed, so events recorded out of order produce negative durations.
///
/// # Thread Safety
///
/// The counter is a single atomic; the clock can be shared across threads
/// by reference or through an `Arc`.
#[derive(Debug)]
pub struct TickClock {
    counter: AtomicI64,
    start: i64,
    step: i64,
}

impl TickClock {
    /// Create a clock starting at 0
    pub const fn new() -> Self {
        Self::with_value(0)
    }

    /// Create a clock starting at `start`
    ///
    /// `start` is also the origin stored in never-written slots.
    pub const fn with_value(start: i64) -> Self {
        TickClock {
            counter: AtomicI64::new(start),
            start,
            step: 1,
        }
    }

    /// Advance by `step` per reading instead of 1
    pub const fn with_step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Read and advance
    pub fn tick(&self) -> i64 {
        self.counter.fetch_add(self.step, Ordering::SeqCst)
    }

    /// Read without advancing
    pub fn current(&self) -> i64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Rewind to the starting value
    pub fn reset(&self) {
        self.counter.store(self.start, Ordering::SeqCst);
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TickClock {
    type TimePoint = i64;
    type Duration = i64;

    fn now(&self) -> i64 {
        self.tick()
    }

    fn origin(&self) -> i64 {
        self.start
    }
}
