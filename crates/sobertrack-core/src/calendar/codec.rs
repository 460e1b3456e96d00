//! Calendar date codec.
//!
//! A [`CalendarDate`] is a pure (year, month, day) value with no time of day
//! and no UTC offset. Converting an instant into one always goes through the
//! target timezone's wall-clock fields, so DST transitions and a viewing
//! device in another zone cannot shift the date.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;
use crate::profile::Profile;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date identified solely by year, month and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from its components. Returns `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDateFormat`] for anything that is not
    /// exactly four year digits, two month digits and two day digits naming a
    /// real date.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDateFormat {
            input: input.to_string(),
        };

        let bytes = input.as_bytes();
        let well_shaped = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !well_shaped {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(input, DATE_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Proleptic Gregorian day number, used for whole-day differences.
    pub fn day_number(&self) -> i64 {
        i64::from(self.0.num_days_from_ce())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// The calendar date of `instant` as observed on a wall clock in `tz`.
pub fn encode_calendar_date<Z: TimeZone>(instant: &DateTime<Z>, tz: Tz) -> CalendarDate {
    CalendarDate(instant.with_timezone(&tz).date_naive())
}

/// Parse `date` and anchor it at local midnight in `tz`, for display only.
///
/// # Errors
/// Returns [`ValidationError::InvalidDateFormat`] if `date` is malformed.
pub fn decode_calendar_date(date: &str, tz: Tz) -> Result<DateTime<Tz>, ValidationError> {
    CalendarDate::parse(date).map(|d| local_midnight(d, tz))
}

/// First instant of `date` in `tz`.
///
/// Where midnight is repeated the earlier occurrence wins. Where midnight is
/// skipped by a DST gap, the first wall-clock instant after the gap is used.
pub fn local_midnight(date: CalendarDate, tz: Tz) -> DateTime<Tz> {
    let naive = date.0.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before_gap = tz
                .offset_from_utc_datetime(&(naive - Duration::days(1)))
                .fix()
                .local_minus_utc();
            let utc = naive - Duration::seconds(i64::from(before_gap));
            Utc.from_utc_datetime(&utc).with_timezone(&tz)
        }
    }
}

/// Parse an IANA timezone identifier.
///
/// # Errors
/// Returns [`ValidationError::InvalidTimezone`] for unknown identifiers.
pub fn parse_timezone(name: &str) -> Result<Tz, ValidationError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ValidationError::InvalidTimezone(name.to_string()))
}

/// The host's IANA timezone, or UTC when it cannot be determined.
pub fn device_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => parse_timezone(&name).unwrap_or_else(|_| {
            tracing::warn!(timezone = %name, "device timezone is not a known IANA zone, using UTC");
            Tz::UTC
        }),
        Err(e) => {
            tracing::warn!(error = %e, "could not determine device timezone, using UTC");
            Tz::UTC
        }
    }
}

/// The timezone used for all of a profile's date math.
///
/// Prefers the profile's own zone and falls back to `device_tz`. Never fails:
/// a stored zone that no longer parses is logged and ignored.
pub fn resolve_timezone(profile: &Profile, device_tz: Tz) -> Tz {
    match profile.timezone.as_deref() {
        Some(name) => parse_timezone(name).unwrap_or_else(|_| {
            tracing::warn!(
                user_id = %profile.user_id,
                timezone = %name,
                "stored profile timezone is invalid, falling back to {}",
                device_tz.name()
            );
            device_tz
        }),
        None => device_tz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn parse_accepts_well_formed_dates() {
        let d = date("2024-02-29");
        assert_eq!(d.to_string(), "2024-02-29");
        assert_eq!(d, CalendarDate::from_ymd(2024, 2, 29).unwrap());
    }

    #[test]
    fn parse_rejects_malformed_dates() {
        for bad in [
            "", "2024-2-09", "2024/02/09", "24-02-09", "2023-02-29", "2024-13-01",
            "2024-02-09T00:00", " 2024-02-09", "abcd-ef-gh", "+2024-02-0",
        ] {
            assert!(
                matches!(
                    CalendarDate::parse(bad),
                    Err(ValidationError::InvalidDateFormat { .. })
                ),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn serde_uses_plain_date_strings() {
        let json = serde_json::to_string(&date("2024-06-02")).unwrap();
        assert_eq!(json, "\"2024-06-02\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date("2024-06-02"));
        assert!(serde_json::from_str::<CalendarDate>("\"06/02/2024\"").is_err());
    }

    #[test]
    fn encode_uses_wall_clock_of_target_zone() {
        // 03:30 UTC on the 10th is still the evening of the 9th in New York.
        let instant = Utc.with_ymd_and_hms(2024, 3, 10, 3, 30, 0).unwrap();
        assert_eq!(
            encode_calendar_date(&instant, chrono_tz::America::New_York),
            date("2024-03-09")
        );
        assert_eq!(encode_calendar_date(&instant, Tz::UTC), date("2024-03-10"));
        assert_eq!(
            encode_calendar_date(&instant, chrono_tz::Asia::Tokyo),
            date("2024-03-10")
        );
    }

    #[test]
    fn encode_ignores_the_instant_source_zone() {
        let tokyo = chrono_tz::Asia::Tokyo
            .with_ymd_and_hms(2024, 11, 3, 8, 0, 0)
            .unwrap();
        assert_eq!(
            encode_calendar_date(&tokyo, chrono_tz::America::Los_Angeles),
            date("2024-11-02")
        );
    }

    #[test]
    fn decode_anchors_at_local_midnight() {
        let tz = chrono_tz::America::New_York;
        let dt = decode_calendar_date("2024-03-10", tz).unwrap();
        assert_eq!(dt.date_naive(), date("2024-03-10").naive());
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert!(decode_calendar_date("March 10", Tz::UTC).is_err());
    }

    #[test]
    fn decode_handles_midnight_dst_gap() {
        // Santiago springs forward at local midnight: 2024-09-08 00:00 does not exist.
        let tz = chrono_tz::America::Santiago;
        let dt = decode_calendar_date("2024-09-08", tz).unwrap();
        assert_eq!(encode_calendar_date(&dt, tz), date("2024-09-08"));
        assert_eq!(dt.hour(), 1);
    }

    #[test]
    fn decode_encode_round_trip_across_zones() {
        let instants = [
            Utc.with_ymd_and_hms(2024, 3, 10, 6, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 10, 7, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 9, 8, 3, 15, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(),
        ];
        let zones = [
            Tz::UTC,
            chrono_tz::America::New_York,
            chrono_tz::America::Santiago,
            chrono_tz::Europe::Berlin,
            chrono_tz::Australia::Lord_Howe,
            chrono_tz::Pacific::Kiritimati,
        ];
        for instant in instants {
            for tz in zones {
                let encoded = encode_calendar_date(&instant, tz);
                let decoded = decode_calendar_date(&encoded.to_string(), tz).unwrap();
                assert_eq!(encode_calendar_date(&decoded, tz), encoded, "{instant} in {tz}");
            }
        }
    }

    #[test]
    fn parse_timezone_validates_names() {
        assert_eq!(
            parse_timezone("America/New_York").unwrap(),
            chrono_tz::America::New_York
        );
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(ValidationError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn resolve_prefers_profile_zone() {
        let mut profile = Profile::unchecked("u1", date("2024-01-01"), Some("Asia/Tokyo".into()));
        assert_eq!(resolve_timezone(&profile, Tz::UTC), chrono_tz::Asia::Tokyo);

        profile.timezone = None;
        assert_eq!(
            resolve_timezone(&profile, chrono_tz::Europe::Berlin),
            chrono_tz::Europe::Berlin
        );
    }

    #[test]
    fn resolve_never_fails_on_bad_stored_zone() {
        let profile = Profile::unchecked("u1", date("2024-01-01"), Some("Not/AZone".into()));
        assert_eq!(
            resolve_timezone(&profile, chrono_tz::Europe::Paris),
            chrono_tz::Europe::Paris
        );
    }
}
