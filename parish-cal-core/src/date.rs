//! Two-digit-year meeting dates ("8 Jan 25").

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::ParseError;

/// Two-digit years further than this below the current one roll into the next century.
pub const YEAR_THRESHOLD: i32 = 50;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2}) (\w{3}) ([0-9]{2})").expect("valid date regex"));

/// Parse a `<day> <Mon> <yy>` token into a date, resolving the century
/// relative to `today`.
///
/// With `today` in 2025:
/// - `"8 Jan 25"` becomes 2025-01-08
/// - `"8 Jan 75"` becomes 2075-01-08
///
/// Only the start of the token has to match; trailing text is ignored.
pub fn parse_event_date(token: &str, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    let caps = DATE_TOKEN
        .captures(token)
        .ok_or_else(|| ParseError::DateFormat(token.to_string()))?;

    let month_abbrev = &caps[2];
    let month = month_number(month_abbrev).ok_or_else(|| ParseError::UnknownMonth {
        month: month_abbrev.to_string(),
        token: token.to_string(),
    })?;

    // Both captures are ASCII digits of bounded width, so these cannot overflow
    let day: u32 = caps[1]
        .parse()
        .map_err(|_| ParseError::DateFormat(token.to_string()))?;
    let year_2digit: i32 = caps[3]
        .parse()
        .map_err(|_| ParseError::DateFormat(token.to_string()))?;

    let year = resolve_century(year_2digit, today.year());

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ParseError::InvalidDate(token.to_string()))
}

/// Map a two-digit year onto the current century, or the next one when it
/// sits more than [`YEAR_THRESHOLD`] years below the current two-digit year.
pub fn resolve_century(year_2digit: i32, current_year: i32) -> i32 {
    let current_2digit = current_year % 100;
    let current_century = current_year - current_2digit;

    if year_2digit < current_2digit - YEAR_THRESHOLD {
        current_century + 100 + year_2digit
    } else {
        current_century + year_2digit
    }
}

fn month_number(abbrev: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .map(|idx| idx as u32 + 1)
}
