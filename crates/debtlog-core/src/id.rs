//! Entry identifiers derived from creation time.
//!
//! An id is the creation timestamp in Unix milliseconds. When two entries
//! are created within the same millisecond (or the clock steps backwards)
//! the allocator bumps past the last issued id, so ids stay unique and
//! strictly increasing within one store.

use serde::Serialize;
use std::{fmt, str::FromStr};

/// Unique, immutable identifier of a debt entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when text is not a valid entry id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid entry id: '{0}'")]
pub struct ParseIdError(pub String);

impl FromStr for EntryId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

/// Source of creation timestamps, injectable for tests.
pub trait Clock {
    /// Current time in Unix milliseconds.
    fn now_millis(&self) -> u64;
}

/// Wall clock backed by `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Issues strictly increasing creation-time ids.
#[derive(Debug)]
pub struct IdAllocator<C = SystemClock> {
    clock: C,
    last: Option<u64>,
}

impl Default for IdAllocator<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> IdAllocator<C> {
    pub const fn new(clock: C) -> Self {
        Self { clock, last: None }
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> EntryId {
        let now = self.clock.now_millis();
        let raw = match self.last {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };
        self.last = Some(raw);
        EntryId(raw)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;

    #[test]
    fn id_is_creation_time_when_clock_advances() {
        let clock = ManualClock::at(1_700_000_000_000);
        let mut ids = IdAllocator::new(&clock);
        assert_eq!(ids.next_id().as_u64(), 1_700_000_000_000);
        clock.set(1_700_000_000_250);
        assert_eq!(ids.next_id().as_u64(), 1_700_000_000_250);
    }

    #[test]
    fn same_millisecond_ids_are_bumped() {
        let clock = ManualClock::at(42);
        let mut ids = IdAllocator::new(&clock);
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
        assert_eq!(c.as_u64(), 44);
    }

    #[test]
    fn clock_going_backwards_keeps_ids_increasing() {
        let clock = ManualClock::at(1_000);
        let mut ids = IdAllocator::new(&clock);
        let a = ids.next_id();
        clock.set(900);
        let b = ids.next_id();
        assert!(b > a);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn parse_and_display_roundtrip() {
        let id: EntryId = " 1700000000123 ".parse().unwrap();
        assert_eq!(id.to_string(), "1700000000123");
        assert!("abc".parse::<EntryId>().is_err());
        assert!("-5".parse::<EntryId>().is_err());
        assert!("".parse::<EntryId>().is_err());
    }
}
