//! Sample timestamps and the injectable clock.
//!
//! # Design
//!
//! Every emitted location carries a [`Timestamp`]: milliseconds since the
//! origin of the [`Clock`] that produced it.  The simulator never reads the
//! system time directly.  It is handed a `Clock`, so tests can substitute a
//! [`SteppingClock`] and get byte-identical output on every run.

use std::fmt;
use std::time::Instant;

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// Milliseconds since the producing clock's origin.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    /// The timestamp one millisecond after `self`.
    #[inline]
    pub fn next(self) -> Timestamp {
        Timestamp(self.0 + 1)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of sample timestamps.
///
/// Implementations should be non-decreasing; the simulator additionally
/// bumps equal readings so emitted timestamps are strictly increasing.
pub trait Clock: Send {
    fn now(&mut self) -> Timestamp;
}

/// Wall-clock time measured from the moment the clock was created.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> Timestamp {
        Timestamp(self.origin.elapsed().as_millis() as u64)
    }
}

/// Deterministic clock: returns `start`, then advances by `step_ms` on every
/// call.
#[derive(Clone, Debug)]
pub struct SteppingClock {
    next:    u64,
    step_ms: u64,
}

impl SteppingClock {
    pub fn new(start: Timestamp, step_ms: u64) -> Self {
        Self { next: start.0, step_ms }
    }
}

impl Clock for SteppingClock {
    fn now(&mut self) -> Timestamp {
        let now = Timestamp(self.next);
        self.next += self.step_ms;
        now
    }
}
