//! Error types for parish-cal.

use thiserror::Error;

/// Errors that can occur while configuring, fetching or generating the calendar.
#[derive(Error, Debug)]
pub enum ParishCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single meeting page could not be fetched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),
}

/// Date and time token failures. These are advisory: the fragment carrying
/// the token is skipped and extraction carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("date '{0}' does not look like '<day> <Mon> <yy>'")]
    DateFormat(String),

    #[error("unknown month abbreviation '{month}' in date '{token}'")]
    UnknownMonth { month: String, token: String },

    #[error("'{0}' is not a valid calendar date")]
    InvalidDate(String),

    #[error("time '{0}' does not start with H:MM")]
    TimeFormat(String),

    #[error("start time '{0}' is not a valid time of day")]
    InvalidStartTime(String),

    #[error("meeting starting {0} runs past the supported date range")]
    EndOutOfRange(String),
}

/// Result type alias for parish-cal operations.
pub type ParishCalResult<T> = Result<T, ParishCalError>;
