//! ICS file generation.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use icalendar::{Calendar, Component, Property};

use crate::config::ScraperConfig;
use crate::error::{ParishCalError, ParishCalResult};
use crate::event::CalendarEvent;

/// Calendar-level header lines, in the order they are written.
const HEADER_ORDER: [&str; 5] = ["VERSION", "PRODID", "CALSCALE", "METHOD", "X-WR-TIMEZONE"];

/// Everything that ends up in the output file.
#[derive(Debug, Clone)]
pub struct CalendarDocument {
    pub product_id: String,
    /// TZID applied to every DTSTART/DTEND
    pub timezone: String,
    /// Right-hand side of generated UIDs
    pub uid_domain: String,
    /// Day of the run, used as DTSTAMP so output is reproducible
    pub stamp: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

impl CalendarDocument {
    pub fn new(config: &ScraperConfig, stamp: NaiveDate, events: Vec<CalendarEvent>) -> Self {
        CalendarDocument {
            product_id: config.product_id.clone(),
            timezone: config.timezone.clone(),
            uid_domain: config.base_host(),
            stamp,
            events,
        }
    }
}

/// Generate the .ics content for a whole calendar document
pub fn generate_ics(doc: &CalendarDocument) -> ParishCalResult<String> {
    doc.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
        ParishCalError::IcsGenerate(format!("Unknown timezone '{}'", doc.timezone))
    })?;

    let mut cal = Calendar::new();
    cal.append_property(Property::new("METHOD", "PUBLISH"));
    cal.append_property(Property::new("X-WR-TIMEZONE", &doc.timezone));

    let dtstamp = doc
        .stamp
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .format("%Y%m%dT%H%M%SZ")
        .to_string();

    let mut seen_uids: HashMap<String, usize> = HashMap::new();

    for event in &doc.events {
        let mut ics_event = icalendar::Event::new();
        ics_event.add_property("UID", event_uid(event, &doc.uid_domain, &mut seen_uids));
        ics_event.add_property("DTSTAMP", &dtstamp);

        add_zoned_datetime(&mut ics_event, "DTSTART", &event.start, &doc.timezone);
        add_zoned_datetime(&mut ics_event, "DTEND", &event.end, &doc.timezone);

        ics_event.summary(&event.title);
        // Always present, empty when the meeting had no documents
        ics_event.description(&event.description);

        cal.push(ics_event.done());
    }

    let cal = cal.done();

    Ok(normalize_ics(&cal.to_string(), &doc.product_id))
}

/// Stable identifier: the same meeting gets the same UID on every run.
///
/// Repeats of a start/title pair within one document get a `-2`, `-3`, ...
/// suffix on the local part, in document order.
fn event_uid(event: &CalendarEvent, domain: &str, seen: &mut HashMap<String, usize>) -> String {
    let local = format!(
        "{}-{}",
        event.start.format("%Y%m%dT%H%M%S"),
        slug::slugify(&event.title)
    );

    let count = seen.entry(local.clone()).or_insert(0);
    *count += 1;

    if *count == 1 {
        format!("{local}@{domain}")
    } else {
        format!("{local}-{count}@{domain}")
    }
}

/// Datetime with TZID parameter
fn add_zoned_datetime(
    ics_event: &mut icalendar::Event,
    name: &str,
    datetime: &NaiveDateTime,
    tzid: &str,
) {
    let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", tzid);
    ics_event.append_property(prop);
}

/// Clean up ICS output from the icalendar crate
/// - Unfold continuation lines and use plain `\n` line endings
/// - Write the calendar header in a fixed order with our PRODID
fn normalize_ics(ics: &str, product_id: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in ics.lines() {
        if let (Some(continuation), Some(last)) =
            (line.strip_prefix([' ', '\t']), lines.last_mut())
        {
            last.push_str(continuation);
            continue;
        }
        lines.push(line.to_string());
    }

    let mut header: Vec<String> = Vec::new();
    let mut body: Vec<String> = Vec::new();
    let mut in_header = true;

    for line in lines {
        if line == "BEGIN:VCALENDAR" {
            continue;
        }
        if line.starts_with("BEGIN:") || line == "END:VCALENDAR" {
            in_header = false;
        }
        if in_header {
            header.push(line);
        } else {
            body.push(line);
        }
    }

    let mut result = String::with_capacity(ics.len());
    result.push_str("BEGIN:VCALENDAR\n");

    for key in HEADER_ORDER {
        let prefix = format!("{key}:");
        let value = match key {
            "VERSION" => Some("VERSION:2.0".to_string()),
            "PRODID" => Some(format!("PRODID:{product_id}")),
            "CALSCALE" => Some("CALSCALE:GREGORIAN".to_string()),
            _ => header.iter().find(|l| l.starts_with(&prefix)).cloned(),
        };
        if let Some(line) = value {
            result.push_str(&line);
            result.push('\n');
        }
    }

    for line in header
        .iter()
        .filter(|l| !is_header_line(l))
        .chain(body.iter())
    {
        result.push_str(line);
        result.push('\n');
    }

    result
}

fn is_header_line(line: &str) -> bool {
    HEADER_ORDER
        .iter()
        .any(|key| line.strip_prefix(key).is_some_and(|rest| rest.starts_with(':')))
}
