//! Conversion between calendar birth dates and the epoch-millisecond
//! timestamps they are persisted as.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Epoch milliseconds of `date` at UTC midnight.
pub fn to_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Calendar date (UTC) of a persisted birth timestamp.
///
/// Timestamps outside chrono's representable range fall back to the epoch.
pub fn to_date(timestamp_millis: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .date_naive()
}
