//! Wall-clock capability. Rules that depend on the current hour read it
//! through `Clock` so tests can pin the hour.

use chrono::{Local, Timelike};

pub trait Clock: Send + Sync {
    /// Current local hour, 0..=23.
    fn hour(&self) -> u32;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn hour(&self) -> u32 {
        self.0 % 24
    }
}
