use crate::calendar::CalendarDate;
use crate::error::ValidationError;

use super::NewSlipUp;

/// Write-time checks shared by every store.
///
/// A restart before the slip is reported ahead of a future slip date.
pub fn validate_slip_up(slip_up: &NewSlipUp, today: CalendarDate) -> Result<(), ValidationError> {
    if slip_up.recovery_restart_date < slip_up.slip_up_date {
        return Err(ValidationError::RestartBeforeSlip {
            slip: slip_up.slip_up_date,
            restart: slip_up.recovery_restart_date,
        });
    }
    if slip_up.slip_up_date > today {
        return Err(ValidationError::FutureSlipDate {
            slip: slip_up.slip_up_date,
            today,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn same_day_restart_is_valid() {
        let s = NewSlipUp::parse("2024-06-01", "2024-06-01").unwrap();
        assert!(validate_slip_up(&s, date("2024-06-10")).is_ok());
    }

    #[test]
    fn slip_today_is_valid() {
        let s = NewSlipUp::parse("2024-06-10", "2024-06-11").unwrap();
        assert!(validate_slip_up(&s, date("2024-06-10")).is_ok());
    }

    #[test]
    fn future_slip_is_rejected() {
        let s = NewSlipUp::parse("2024-06-11", "2024-06-12").unwrap();
        assert_eq!(
            validate_slip_up(&s, date("2024-06-10")),
            Err(ValidationError::FutureSlipDate {
                slip: date("2024-06-11"),
                today: date("2024-06-10"),
            })
        );
    }

    #[test]
    fn malformed_dates_fail_before_validation() {
        assert!(matches!(
            NewSlipUp::parse("2024-06-01", "June 2nd"),
            Err(ValidationError::InvalidDateFormat { .. })
        ));
    }

    proptest! {
        #[test]
        fn restart_before_slip_always_rejected(
            slip_offset in 1i64..20_000,
            gap in 1i64..5_000,
            today_offset in 0i64..40_000,
        ) {
            let base = date("1970-01-01").naive();
            let slip = CalendarDate::from_naive(base + chrono::Duration::days(slip_offset));
            let restart = CalendarDate::from_naive(slip.naive() - chrono::Duration::days(gap));
            let today = CalendarDate::from_naive(base + chrono::Duration::days(today_offset));
            let result = validate_slip_up(&NewSlipUp::new(slip, restart), today);
            let is_restart_before_slip =
                matches!(result, Err(ValidationError::RestartBeforeSlip { .. }));
            prop_assert!(is_restart_before_slip);
        }
    }
}
