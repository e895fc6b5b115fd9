mod commands;
mod render;
mod utils;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use commands::generate::{Destination, RunOutcome};
use owo_colors::OwoColorize;
use parish_cal_core::ScraperConfig;
use parish_cal_core::fetch::HttpFetcher;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parish-cal")]
#[command(about = "Turn parish council meeting pages into an iCalendar file")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.config/parish-cal/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch meeting pages and write the calendar (default)
    Generate {
        /// Output .ics path (overrides the configured output_file)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the calendar to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// List the configured meeting sources
    Sources,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunOutcome> {
    let config = ScraperConfig::load(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Commands::Generate {
        output: None,
        stdout: false,
        today: None,
    });

    match command {
        Commands::Generate {
            output,
            stdout,
            today,
        } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let output = output.unwrap_or_else(|| config.output_path());
            let destination = if stdout {
                Destination::Stdout
            } else {
                Destination::File(&output)
            };
            let fetcher = HttpFetcher::new(config.request_timeout)?;
            commands::generate::run(&fetcher, &config, today, destination).await
        }
        Commands::Sources => {
            commands::sources::run(&config)?;
            Ok(RunOutcome::Success)
        }
    }
}

/// Logs go to stderr; the default level is WARN so the run summary stays readable.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
