//! Whole calendar-day differences.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

use super::codec::{encode_calendar_date, CalendarDate};

/// Anything that names a calendar date once a timezone is fixed.
pub trait IntoCalendarDate {
    fn calendar_date_in(&self, tz: Tz) -> CalendarDate;
}

impl IntoCalendarDate for CalendarDate {
    fn calendar_date_in(&self, _tz: Tz) -> CalendarDate {
        *self
    }
}

impl<Z: TimeZone> IntoCalendarDate for DateTime<Z> {
    fn calendar_date_in(&self, tz: Tz) -> CalendarDate {
        encode_calendar_date(self, tz)
    }
}

/// Number of calendar-day boundaries between `start` and `end` in `tz`.
///
/// Both endpoints are reduced to (y, m, d) in `tz` and differenced through
/// their day numbers, so a 23- or 25-hour DST day still counts as one day.
/// The result is negative when `end` falls before `start`.
pub fn calendar_day_diff<A, B>(start: &A, end: &B, tz: Tz) -> i64
where
    A: IntoCalendarDate + ?Sized,
    B: IntoCalendarDate + ?Sized,
{
    end.calendar_date_in(tz).day_number() - start.calendar_date_in(tz).day_number()
}
