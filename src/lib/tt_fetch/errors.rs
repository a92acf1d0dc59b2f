use thiserror::Error;

use super::accumulator::TimetableByDay;

/// The range expression could not be turned into a pair of dates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRangeError {
    #[error("unrecognised date range {0:?}")]
    Syntax(String),
    #[error("{day:02}.{month:02}.{year} is not a calendar date")]
    InvalidDate { day: u32, month: u32, year: i32 },
    #[error("range starts on {start} but ends earlier, on {end}")]
    Reversed { start: String, end: String },
}

#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("wrong login or password")]
    BadCredentials,
    #[error("could not find {0} in the portal response")]
    MissingToken(&'static str),
    #[error("portal unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("week request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed week payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("page announces {num_rows} rows but carries {items} items")]
    InconsistentPage { num_rows: usize, items: usize },
    #[error("timestamp {0} ms is out of range")]
    Timestamp(i64),
}

/// A week fetch failed midway; whatever was merged before it is kept in `partial`.
#[derive(Error, Debug)]
#[error("timetable incomplete, fetching week of {week_start} failed: {source}")]
pub struct PaginationError {
    pub week_start: chrono::NaiveDateTime,
    pub partial: TimetableByDay,
    #[source]
    pub source: FetchError,
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
    #[error("unknown time zone {0:?}")]
    TimeZone(String),
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Range(#[from] MalformedRangeError),
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthenticationError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}
