//! Timestamp helpers: narrow API timestamps to calendar dates and format them for output.

use crate::error::EtlError;
use serde::Serializer;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Parse an RFC 3339 timestamp (`2023-05-01T12:34:56Z`, fractional seconds allowed)
/// and keep only its calendar date, in the timestamp's own offset.
pub fn calendar_date(ts: &str) -> Result<Date, EtlError> {
    OffsetDateTime::parse(ts.trim(), &Rfc3339)
        .map(|dt| dt.date())
        .map_err(|e| EtlError::transformation(format!("invalid timestamp {:?}", ts), e))
}

/// `YYYY-MM-DD`
pub fn format_date(d: Date) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    d.format(&fmt).unwrap_or_else(|_| d.to_string())
}

pub fn serialize_date<S: Serializer>(d: &Date, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_date(*d))
}

/// Filename stamp `YYYYMMDD_HHMMSS`, local time when the offset is known, else UTC.
pub fn file_stamp(now: OffsetDateTime) -> String {
    let fmt = format_description!("[year][month][day]_[hour][minute][second]");
    now.format(&fmt).unwrap_or_else(|_| now.unix_timestamp().to_string())
}

pub fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
