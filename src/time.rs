//! Monotonic timestamp abstraction shared by interrupt and main contexts.

/// A monotonic tick count (microseconds on the reference board).
///
/// Zero doubles as the "unset" sentinel written by a button reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The reset sentinel.
    pub const UNSET: Self = Timestamp(0);

    /// Creates a timestamp from raw ticks.
    #[inline]
    pub const fn from_ticks(ticks: u64) -> Self {
        Timestamp(ticks)
    }

    /// Returns the raw tick count.
    #[inline]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns true for the reset sentinel.
    #[inline]
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }

    /// Ticks elapsed since `earlier`, or `None` if time moved backward.
    #[inline]
    pub fn checked_duration_since(self, earlier: Self) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }

    /// Ticks elapsed since `earlier`, treating the counter as wrapping.
    #[inline]
    pub fn wrapping_duration_since(self, earlier: Self) -> u64 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Adds ticks, wrapping on overflow.
    #[inline]
    pub fn wrapping_add(self, ticks: u64) -> Self {
        Timestamp(self.0.wrapping_add(ticks))
    }
}

impl From<u64> for Timestamp {
    fn from(ticks: u64) -> Self {
        Timestamp(ticks)
    }
}

/// Trait for abstracting time sources.
///
/// Implementations must be safe to call from interrupt context: the edge
/// dispatcher samples the clock on every notification.
pub trait TimeSource {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
