//! Source of "now" for the service layer.
//!
//! The calculator never reads a clock; callers inject today's date. This
//! trait is how the service layer obtains it.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::calendar::{encode_calendar_date, CalendarDate};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Today's calendar date on a wall clock in `tz`.
    fn today_in(&self, tz: Tz) -> CalendarDate {
        encode_calendar_date(&self.now(), tz)
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
