//! Meeting time tokens ("19:00 to 21:00", "18:00").

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}:[0-9]{2}) to ([0-9]{1,2}:[0-9]{2})").expect("valid time range regex")
});

static SINGLE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2}:[0-9]{2})").expect("valid time regex"));

/// Start and optional end of a meeting, as they appear on the page.
///
/// The values are kept as `H:MM` text; whether they name a real time of day
/// is decided when the event is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: Option<String>,
}

/// Parse the leading time or time range of a paragraph.
///
/// The range form is tried first, so `"19:00 to 21:00"` yields both times
/// and `"18:00"` yields only a start.
pub fn parse_time_range(text: &str) -> Result<TimeRange, ParseError> {
    if let Some(caps) = TIME_RANGE.captures(text) {
        return Ok(TimeRange {
            start: caps[1].to_string(),
            end: Some(caps[2].to_string()),
        });
    }

    if let Some(caps) = SINGLE_TIME.captures(text) {
        return Ok(TimeRange {
            start: caps[1].to_string(),
            end: None,
        });
    }

    Err(ParseError::TimeFormat(text.to_string()))
}
