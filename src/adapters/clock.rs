//! Clock adapters.

use std::sync::{Mutex, PoisonError};

use chrono::{Duration, Utc};
use chrono_tz::Tz;

use crate::domain::foundation::LocalTime;
use crate::ports::Clock;

/// Reads the system clock and expresses it in the studio timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> LocalTime {
        Utc::now().with_timezone(&self.timezone)
    }
}

/// Manually controlled clock for tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<LocalTime>,
}

impl FixedClock {
    pub fn new(now: LocalTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: LocalTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = *now + by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> LocalTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
