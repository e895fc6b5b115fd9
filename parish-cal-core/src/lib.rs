//! Core of parish-cal.
//!
//! Turns parish council meeting pages into a single iCalendar document:
//! - `date` / `time_range` parse the loosely formatted tokens on the page
//! - `event` builds calendar events from them
//! - `extract` finds meeting blocks in a page
//! - `aggregate` runs every configured source through `fetch` and `extract`
//! - `ics` renders the result

pub mod aggregate;
pub mod config;
pub mod date;
pub mod error;
pub mod event;
pub mod extract;
pub mod fetch;
pub mod ics;
pub mod time_range;

pub use aggregate::{RunReport, SourceOutcome, collect_events};
pub use crate::config::{MeetingSource, ScraperConfig};
pub use error::{FetchError, ParishCalError, ParishCalResult, ParseError};
pub use event::CalendarEvent;
