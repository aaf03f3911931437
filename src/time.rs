//! Time abstraction traits for platform-agnostic timing.
//!
//! The renderers never read a clock directly. They are handed a [`TimeSource`]
//! and compare instants against their configured intervals, so the same code
//! runs against a hardware tick counter or a simulated clock in tests.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Returns the shorter of two durations.
pub(crate) fn min_duration<D: TimeDuration>(a: D, b: D) -> D {
    if a.as_millis() <= b.as_millis() { a } else { b }
}

/// Millisecond duration for platforms driven by a 1 ms system tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u64);

impl TimeDuration for Millis {
    const ZERO: Self = Millis(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        Millis(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        Millis(self.0.saturating_sub(other.0))
    }
}

/// Point in time read from a wrapping 32-bit millisecond counter.
///
/// The counter wraps after ~49.7 days; `duration_since` uses wrapping
/// arithmetic so intervals spanning the wrap stay correct as long as they are
/// shorter than the full counter range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MillisInstant(pub u32);

impl MillisInstant {
    /// Returns the raw tick count.
    pub fn as_millis(&self) -> u32 {
        self.0
    }
}

impl TimeInstant for MillisInstant {
    type Duration = Millis;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Millis(self.0.wrapping_sub(earlier.0) as u64)
    }
}
