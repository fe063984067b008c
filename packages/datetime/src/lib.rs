#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Date and time normalization for shooting incident records.
//!
//! Source records carry their incident date as a `YYYY/MM/DD HH:MM:SS`
//! string. This crate parses that fixed pattern and derives the canonical
//! numeric fields the dashboard filters on: epoch milliseconds, milliseconds
//! since midnight, weekday index, and day of year.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};

/// The fixed input pattern for incident date strings.
pub const DATE_PATTERN: &str = "%Y/%m/%d %H:%M:%S";

/// Milliseconds in one day.
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// An incident date string did not match [`DATE_PATTERN`].
#[derive(Debug, thiserror::Error)]
#[error("date string {input:?} does not match pattern {DATE_PATTERN}")]
pub struct ParseError {
    /// The rejected input.
    pub input: String,
}

/// Parses an incident date string under the fixed `YYYY/MM/DD HH:MM:SS`
/// pattern.
///
/// # Errors
///
/// Returns [`ParseError`] if the string does not match the pattern exactly.
pub fn parse_time(s: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(s, DATE_PATTERN).map_err(|_| ParseError {
        input: s.to_owned(),
    })
}

/// Milliseconds since midnight for the given wall-clock time, in
/// `[0, 86_400_000)`.
#[must_use]
pub fn ms_since_midnight(dt: NaiveDateTime) -> i64 {
    i64::from(dt.num_seconds_from_midnight()) * 1000
}

/// The instant as Unix epoch milliseconds, interpreting the wall-clock time
/// in the local timezone.
#[must_use]
pub fn epoch_ms(dt: NaiveDateTime) -> i64 {
    epoch_ms_in(dt, &Local)
}

/// [`epoch_ms`] generalized over the timezone.
///
/// A wall-clock time repeated by a DST fall-back maps to its earlier
/// occurrence; a time skipped by a spring-forward gap falls back to the UTC
/// reading.
pub fn epoch_ms_in<Tz: TimeZone>(dt: NaiveDateTime, tz: &Tz) -> i64 {
    tz.from_local_datetime(&dt)
        .earliest()
        .map_or_else(|| dt.and_utc().timestamp_millis(), |t| t.timestamp_millis())
}

/// Weekday index, Sunday = 0 through Saturday = 6.
#[must_use]
pub fn weekday_index(dt: NaiveDateTime) -> u32 {
    dt.weekday().num_days_from_sunday()
}

/// Day of the year, in `[1, 366]`.
///
/// Computed on the civil date, so the value is stable across DST
/// boundaries.
#[must_use]
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// The date reached by starting at Jan 1 of `year` and advancing `day - 1`
/// days.
///
/// `day` may exceed the length of the year; the arithmetic rolls over
/// month and year boundaries, so day 400 of 2020 lands in February 2021.
/// Returns `None` when the result is outside chrono's representable range.
#[must_use]
pub fn date_from_day(year: i32, day: i64) -> Option<NaiveDate> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    jan_first.checked_add_signed(Duration::days(day - 1))
}

/// Renders [`date_from_day`] as short human-readable text, e.g. `"Feb 3"`.
#[must_use]
pub fn format_short_date(year: i32, day: i64) -> Option<String> {
    date_from_day(year, day).map(|date| date.format("%b %-d").to_string())
}

/// Converts milliseconds since midnight to 12-hour clock text, `"H:MM AM/PM"`.
///
/// Midnight and noon render hour `12`, not `0`.
#[must_use]
pub fn ms_to_clock_string(ms: i64) -> String {
    let ms = ms.rem_euclid(DAY_MS);
    let minutes = (ms / 60_000) % 60;
    let hours = ms / 3_600_000;
    let ampm = if hours >= 12 { "PM" } else { "AM" };
    let clock_hour = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{clock_hour}:{minutes:02} {ampm}")
}
