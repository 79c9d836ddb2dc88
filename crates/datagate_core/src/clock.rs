//! Time source for lifecycle stamping.
//!
//! The gateway truncates whatever a clock returns to millisecond precision
//! before stamping, so clocks may report finer instants.

use crate::model::Timestamp;
use chrono::Utc;

/// Supplies "now" to the gateway.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
