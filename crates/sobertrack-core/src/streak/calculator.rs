//! Days-sober derivation.
//!
//! The summary is recomputed from the full slip-up history on every call.
//! Nothing here is cached or persisted, and nothing here can fail.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{calendar_day_diff, CalendarDate, IntoCalendarDate};
use crate::slipup::{NewSlipUp, SlipUpRecord};

/// Anything carrying the date a recovery restarted.
pub trait HasRestartDate {
    fn recovery_restart_date(&self) -> CalendarDate;
}

impl HasRestartDate for SlipUpRecord {
    fn recovery_restart_date(&self) -> CalendarDate {
        self.recovery_restart_date
    }
}

impl HasRestartDate for NewSlipUp {
    fn recovery_restart_date(&self) -> CalendarDate {
        self.recovery_restart_date
    }
}

impl HasRestartDate for CalendarDate {
    fn recovery_restart_date(&self) -> CalendarDate {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    /// Whole calendar days from the current streak start to today.
    pub days_sober: u32,
    /// The original journey start; a slip-up never rewrites it.
    pub journey_start_date: CalendarDate,
    /// Latest recovery restart date, or the journey start with no slip-ups.
    pub current_streak_start_date: CalendarDate,
    /// Whether any slip-up has been recorded.
    pub has_slip_ups: bool,
}

/// Derive the current streak.
///
/// The streak restarts at the latest `recovery_restart_date` in `slip_ups`,
/// compared as calendar dates, regardless of the order records were logged
/// in. A start after `today` (clock skew) yields zero days rather than a
/// negative count.
pub fn compute_streak<R, T>(
    journey_start: CalendarDate,
    slip_ups: &[R],
    today: &T,
    tz: Tz,
) -> StreakSummary
where
    R: HasRestartDate,
    T: IntoCalendarDate + ?Sized,
{
    let current_streak_start_date = slip_ups
        .iter()
        .map(HasRestartDate::recovery_restart_date)
        .max()
        .unwrap_or(journey_start);

    let diff = calendar_day_diff(&current_streak_start_date, today, tz);
    if diff < 0 {
        tracing::debug!(
            start = %current_streak_start_date,
            diff,
            "streak start is after today, clamping to zero"
        );
    }
    let days_sober = u32::try_from(diff.max(0)).unwrap_or(u32::MAX);

    StreakSummary {
        days_sober,
        journey_start_date: journey_start,
        current_streak_start_date,
        has_slip_ups: !slip_ups.is_empty(),
    }
}
