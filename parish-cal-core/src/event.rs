//! Calendar event records and the builder that assembles them.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::error::ParseError;
use crate::time_range::TimeRange;

/// A single meeting, ready to be serialized.
///
/// Timestamps are wall-clock times in the calendar's fixed timezone.
/// `start < end` always holds for events produced by [`build_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    /// Zero or more "Label: URL" lines
    pub description: String,
}

impl CalendarEvent {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Combine a date, a parsed time range and the event text into an event.
///
/// A missing, invalid or non-increasing end time is replaced by
/// `start + default_duration`. Errors only when the start time is invalid or
/// that fallback end falls outside the representable date range.
pub fn build_event(
    date: NaiveDate,
    times: &TimeRange,
    title: &str,
    description: &str,
    default_duration: Duration,
) -> Result<CalendarEvent, ParseError> {
    let start_time = parse_time_of_day(&times.start)
        .ok_or_else(|| ParseError::InvalidStartTime(times.start.clone()))?;
    let start = date.and_time(start_time);
    let fallback = start
        .checked_add_signed(default_duration)
        .ok_or_else(|| ParseError::EndOutOfRange(start.to_string()))?;

    let end = match times.end.as_deref() {
        None => fallback,
        Some(end_str) => match parse_time_of_day(end_str) {
            Some(end_time) if date.and_time(end_time) > start => date.and_time(end_time),
            Some(_) => {
                warn!(
                    "End time '{}' is not after start '{}' on {}, using default duration",
                    end_str, times.start, date
                );
                fallback
            }
            None => {
                warn!(
                    "Failed to parse end time '{}' on {}, using default duration",
                    end_str, date
                );
                fallback
            }
        },
    };

    Ok(CalendarEvent {
        start,
        end,
        title: title.to_string(),
        description: description.to_string(),
    })
}

fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}
