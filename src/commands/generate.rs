use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use parish_cal_core::collect_events;
use parish_cal_core::fetch::Fetch;
use parish_cal_core::ics::{CalendarDocument, generate_ics};
use parish_cal_core::ScraperConfig;
use tracing::{error, info, warn};

use crate::render::{Render, pluralize};
use crate::utils::tui;

/// How a generate run ended, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    NoEvents,
    WriteFailed,
}

impl RunOutcome {
    pub fn code(self) -> u8 {
        match self {
            RunOutcome::Success => 0,
            RunOutcome::NoEvents => 2,
            RunOutcome::WriteFailed => 3,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Where the calendar goes.
pub enum Destination<'a> {
    File(&'a Path),
    Stdout,
}

pub async fn run<F: Fetch>(
    fetcher: &F,
    config: &ScraperConfig,
    today: NaiveDate,
    destination: Destination<'_>,
) -> Result<RunOutcome> {
    info!("Starting {} calendar scraper", config.organization);

    let spinner = tui::fetch_spinner(config.sources.len());
    let progress = tui::SpinnerFetcher::new(fetcher, &spinner, config.sources.len());
    let report = collect_events(&progress, config, today).await;
    spinner.finish_and_clear();

    // Keep stdout clean for the calendar itself
    let to_stdout = matches!(destination, Destination::Stdout);
    let say = |line: String| {
        if to_stdout {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    };

    say(report.render());

    if report.is_empty() {
        error!("Zero events found across all meeting types");
        error!("The website structure may have changed, all meetings may be in the past, or requests failed");
        say(format!(
            "\n{}",
            "No upcoming meetings found, calendar not written".red()
        ));
        return Ok(RunOutcome::NoEvents);
    }

    let failed = report.failed_sources();
    if !failed.is_empty() {
        warn!("Failed to fetch some meetings: {}", failed.join(", "));
        warn!("Calendar will be incomplete");
    }

    let count = report.events.len();
    let doc = CalendarDocument::new(config, today, report.events);
    let ics = generate_ics(&doc).context("Failed to generate calendar")?;

    match destination {
        Destination::Stdout => {
            std::io::stdout()
                .write_all(ics.as_bytes())
                .context("Failed to write calendar to stdout")?;
        }
        Destination::File(path) => {
            if let Err(e) = write_calendar(path, &ics) {
                error!("Failed to write calendar file {}: {:#}", path.display(), e);
                say(format!(
                    "\n{}",
                    format!("Failed to write {}: {:#}", path.display(), e).red()
                ));
                return Ok(RunOutcome::WriteFailed);
            }
            info!(
                "Successfully created {} with {} upcoming meetings",
                path.display(),
                count
            );
            say(format!(
                "\nWrote {} upcoming {} to {}",
                count,
                pluralize("meeting", count),
                path.display()
            ));
        }
    }

    Ok(RunOutcome::Success)
}

/// Replace `path` with `contents` in one step, so readers never see a
/// half-written calendar.
pub fn write_calendar(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Could not create temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Could not replace {}", path.display()))?;

    Ok(())
}
