//! ICS calendar generation.
//!
//! This module renders collected meetings into a single RFC 5545 calendar.

mod generate;

pub use generate::{CalendarDocument, generate_ics};
