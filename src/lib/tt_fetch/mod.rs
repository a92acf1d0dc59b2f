//! Fetching a personal timetable from a university `stud-app` portal,
//! one week-scoped query at a time.
pub mod accumulator;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod pagination;
pub mod portal_session;
pub mod range_parser;
pub mod run_tool;
pub mod week_fetcher;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
