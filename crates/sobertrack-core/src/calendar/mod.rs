mod codec;
mod day_count;

pub use codec::{
    decode_calendar_date, device_timezone, encode_calendar_date, local_midnight, parse_timezone,
    resolve_timezone, CalendarDate,
};
pub use day_count::{calendar_day_diff, IntoCalendarDate};
