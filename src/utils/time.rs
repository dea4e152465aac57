
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};


/// This is the standard way of converting a date to a string in jielema.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the first moment strictly after `after` whose time of day is `time`.
pub fn next_occurrence(after: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let candidate = after.date().and_time(time);
    if candidate > after {
        candidate
    } else {
        candidate + Duration::days(1)
    }
}
