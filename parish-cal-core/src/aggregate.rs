//! Running every configured source and collecting the results.

use chrono::NaiveDate;
use tracing::{error, info};

use crate::config::{MeetingSource, ScraperConfig};
use crate::error::FetchError;
use crate::event::CalendarEvent;
use crate::extract::{ExtractContext, extract_events};
use crate::fetch::Fetch;

/// What happened to one source during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub name: String,
    pub result: Result<usize, FetchError>,
}

/// Events from all sources, in source order, plus per-source outcomes.
#[derive(Debug, Default)]
pub struct RunReport {
    pub events: Vec<CalendarEvent>,
    pub outcomes: Vec<SourceOutcome>,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Names of sources whose page could not be fetched.
    pub fn failed_sources(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.name.as_str())
            .collect()
    }
}

/// Fetch and extract every source in configured order.
///
/// Sources are processed one at a time. A failed fetch is recorded and the
/// run moves on to the next source.
pub async fn collect_events<F: Fetch>(
    fetcher: &F,
    config: &ScraperConfig,
    today: NaiveDate,
) -> RunReport {
    let ctx = ExtractContext::new(config, today);
    let mut report = RunReport::default();

    for source in &config.sources {
        let result = collect_source(fetcher, source, &ctx).await.map(|events| {
            let count = events.len();
            report.events.extend(events);
            count
        });

        report.outcomes.push(SourceOutcome {
            name: source.name.clone(),
            result,
        });
    }

    info!("Total events collected: {}", report.events.len());
    report
}

/// Fetch one source and extract its upcoming meetings.
pub async fn collect_source<F: Fetch>(
    fetcher: &F,
    source: &MeetingSource,
    ctx: &ExtractContext,
) -> Result<Vec<CalendarEvent>, FetchError> {
    info!("Fetching {} page from {}", source.name, source.url);

    let html = fetcher.fetch(&source.url).await.inspect_err(|e| {
        error!("Failed to fetch {} page: {}", source.name, e);
    })?;

    let events = extract_events(&html, &source.name, ctx);
    info!(
        "Extracted {} upcoming events from {}",
        events.len(),
        source.name
    );
    Ok(events)
}
