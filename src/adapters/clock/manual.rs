//! Manually driven clock adapter for deterministic tests.
//!
//! Stands in for the external simulation clock: time only moves when the
//! test (or harness) advances it.

use std::sync::Mutex;

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Clock whose time is set explicitly.
///
/// # Panics
///
/// Methods may panic if the internal lock is poisoned. This is acceptable
/// for test code but this adapter should NOT be used in production.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    /// Creates a clock frozen at the given instant.
    pub fn starting_at(instant: Timestamp) -> Self {
        Self {
            current: Mutex::new(instant),
        }
    }

    /// Sets the current instant.
    pub fn set(&self, instant: Timestamp) {
        *self
            .current
            .lock()
            .expect("ManualClock: current lock poisoned") = instant;
    }

    /// Moves the clock forward by the given number of seconds.
    pub fn advance_secs(&self, secs: u64) {
        let mut current = self
            .current
            .lock()
            .expect("ManualClock: current lock poisoned");
        *current = current.plus_secs(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self
            .current
            .lock()
            .expect("ManualClock: current lock poisoned")
    }
}
