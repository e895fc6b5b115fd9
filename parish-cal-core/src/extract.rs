//! Meeting extraction from council HTML pages.
//!
//! Each meeting on a page sits in a `<div class="minutes">` block:
//!
//! ```html
//! <div class="minutes">
//!   <h4>8 Jan 25</h4>
//!   <p>19:00 to 21:00</p>
//!   <a href="/agenda.pdf">Agenda</a>
//!   <a href="/minutes.pdf">Minutes</a>
//! </div>
//! ```
//!
//! Blocks that don't parse are skipped; the page as a whole never fails.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::config::{ScraperConfig, resolve_link};
use crate::date::parse_event_date;
use crate::event::{CalendarEvent, build_event};
use crate::time_range::parse_time_range;

static FRAGMENT: LazyLock<Selector> = LazyLock::new(|| selector("div.minutes"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h4"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Everything extraction needs besides the page itself.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    pub organization: String,
    pub base_url: String,
    pub default_duration: Duration,
    /// Meetings dated before this day are dropped
    pub today: NaiveDate,
}

impl ExtractContext {
    pub fn new(config: &ScraperConfig, today: NaiveDate) -> Self {
        ExtractContext {
            organization: config.organization.clone(),
            base_url: config.base_url.clone(),
            default_duration: config.default_duration,
            today,
        }
    }
}

/// Extract upcoming meetings of one category from a page.
pub fn extract_events(html: &str, category: &str, ctx: &ExtractContext) -> Vec<CalendarEvent> {
    let document = Html::parse_document(html);
    let fragments: Vec<ElementRef> = document.select(&FRAGMENT).collect();
    info!(
        "Found {} potential event divs for {}",
        fragments.len(),
        category
    );

    fragments
        .into_iter()
        .filter_map(|fragment| extract_fragment(fragment, category, ctx))
        .collect()
}

fn extract_fragment(
    fragment: ElementRef,
    category: &str,
    ctx: &ExtractContext,
) -> Option<CalendarEvent> {
    let Some(heading) = fragment.select(&HEADING).next() else {
        debug!("Skipping div without h4 tag for {}", category);
        return None;
    };

    let date_str = stripped_text(heading);
    let date = match parse_event_date(&date_str, ctx.today) {
        Ok(date) => date,
        Err(e) => {
            warn!("Could not parse date for {}: {}", category, e);
            return None;
        }
    };

    if date < ctx.today {
        debug!("Skipping past event for {}: {}", category, date);
        return None;
    }

    let Some(paragraph) = fragment.select(&PARAGRAPH).next() else {
        warn!("No time information found for {} on {}", category, date);
        return None;
    };

    let time_str = stripped_text(paragraph);
    let times = match parse_time_range(&time_str) {
        Ok(times) => times,
        Err(e) => {
            warn!("Could not parse time for {} on {}: {}", category, date, e);
            return None;
        }
    };

    let title = format!("{} - {} Meeting", ctx.organization, category);
    let description = document_links(fragment, &ctx.base_url);

    match build_event(date, &times, &title, &description, ctx.default_duration) {
        Ok(event) => {
            info!("Added event: {} on {} at {}", category, date, times.start);
            Some(event)
        }
        Err(e) => {
            warn!("Failed to build event for {} on {}: {}", category, date, e);
            None
        }
    }
}

/// "Agenda: <url>" and "Minutes: <url>" lines for the fragment's links.
///
/// A link whose text mentions both contributes both lines. Links without an
/// href are ignored.
fn document_links(fragment: ElementRef, base_url: &str) -> String {
    let mut description = String::new();

    for link in fragment.select(&LINK) {
        let Some(href) = link.value().attr("href").filter(|h| !h.is_empty()) else {
            continue;
        };
        let url = resolve_link(base_url, href);
        let text: String = link.text().collect();

        if text.contains("Agenda") {
            description.push_str(&format!("Agenda: {url}\n"));
        }
        if text.contains("Minutes") {
            description.push_str(&format!("Minutes: {url}\n"));
        }
    }

    description.trim().to_string()
}

/// Text of an element with each text node trimmed, then concatenated.
fn stripped_text(element: ElementRef) -> String {
    element.text().map(str::trim).collect()
}
