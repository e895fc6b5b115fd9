//! Terminal rendering for run results.
//!
//! Extension traits that add colored output to parish-cal-core types using
//! owo_colors.

use owo_colors::OwoColorize;
use parish_cal_core::{MeetingSource, RunReport, SourceOutcome};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for SourceOutcome {
    fn render(&self) -> String {
        match &self.result {
            Ok(0) => format!("   {} {}", self.name, "no upcoming meetings".dimmed()),
            Ok(count) => format!(
                "   {} {}",
                self.name,
                format!("{} upcoming {}", count, pluralize("meeting", *count)).green()
            ),
            Err(e) => format!("   {} {}", self.name, format!("failed: {e}").red()),
        }
    }
}

impl Render for MeetingSource {
    fn render(&self) -> String {
        format!("📅 {}\n   {}", self.name, self.url.dimmed())
    }
}

impl Render for RunReport {
    fn render(&self) -> String {
        let mut lines: Vec<String> = self.outcomes.iter().map(Render::render).collect();

        let failed = self.failed_sources();
        if !failed.is_empty() {
            lines.push(String::new());
            lines.push(
                format!("Failed to fetch: {}", failed.join(", "))
                    .yellow()
                    .to_string(),
            );
        }

        lines.join("\n")
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
