//! Walks the requested range one week at a time.
//!
//! The driver starts on the Monday of the range's first week and stops once
//! the latest tile seen ends a day at or after the range end, or once the
//! weeks fetched so far cover the range end. An empty week still moves the
//! comparison instant to the following Monday, so a run of empty weeks keeps
//! making progress.
use chrono::{Days, NaiveDateTime, NaiveTime};
use log::{debug, info};

use super::{
    accumulator::{merge, TimetableByDay},
    errors::PaginationError,
    range_parser::{end_of_day, monday_of, DateRange},
    week_fetcher::{WeekFetcher, WeekSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Init,
    Fetching,
    ProgressCheck,
    Done,
}

/// Same time of day, on the Monday after `instant`'s week.
pub fn next_monday(instant: NaiveDateTime) -> NaiveDateTime {
    (monday_of(instant.date()) + Days::new(7)).and_time(instant.time())
}

pub struct PaginationDriver<'a, S: WeekSource> {
    fetcher: WeekFetcher<'a, S>,
    range: DateRange,
    state: DriverState,
    current_week_start: NaiveDateTime,
    last_timestamp: NaiveDateTime,
    latest_in_last_fetch: Option<NaiveDateTime>,
    timetable: TimetableByDay,
    fetches: usize,
}

impl<'a, S: WeekSource> PaginationDriver<'a, S> {
    pub fn new(fetcher: WeekFetcher<'a, S>, range: DateRange) -> PaginationDriver<'a, S> {
        PaginationDriver {
            fetcher,
            range,
            state: DriverState::Init,
            current_week_start: range.start,
            last_timestamp: range.start,
            latest_in_last_fetch: None,
            timetable: TimetableByDay::new(),
            fetches: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn fetches(&self) -> usize {
        self.fetches
    }

    fn transition(&mut self, next: DriverState) {
        debug!("Pagination {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn range_covered(&self) -> bool {
        end_of_day(self.last_timestamp.date()) >= self.range.end
            // The week just fetched already reaches past the range end, so a
            // further week could only hold tiles the range filter drops.
            || self.current_week_start + Days::new(7) > self.range.end
    }

    /// Runs one state. Returns `false` once `Done` is reached.
    pub async fn step(&mut self) -> Result<bool, PaginationError> {
        match self.state {
            DriverState::Init => {
                self.current_week_start =
                    monday_of(self.range.start.date()).and_time(NaiveTime::MIN);
                self.last_timestamp = self.current_week_start;
                self.transition(DriverState::Fetching);
            }
            DriverState::Fetching => {
                self.fetches += 1;
                let page = match self.fetcher.fetch(self.current_week_start).await {
                    Ok(page) => page,
                    Err(source) => {
                        return Err(PaginationError {
                            week_start: self.current_week_start,
                            partial: std::mem::take(&mut self.timetable),
                            source,
                        })
                    }
                };
                let fetched = merge(&page, &self.range);
                info!(
                    "Kept {} of {} tiles from week of {}",
                    fetched.tile_count(),
                    page.len(),
                    self.current_week_start.format("%d.%m.%Y")
                );
                self.latest_in_last_fetch = fetched.latest_timestamp();
                self.timetable.absorb(fetched);
                self.transition(DriverState::ProgressCheck);
            }
            DriverState::ProgressCheck => {
                self.last_timestamp = match self.latest_in_last_fetch {
                    Some(latest) => latest,
                    None => next_monday(self.last_timestamp),
                };
                if self.range_covered() {
                    self.transition(DriverState::Done);
                } else {
                    self.current_week_start = self.current_week_start + Days::new(7);
                    self.transition(DriverState::Fetching);
                }
            }
            DriverState::Done => return Ok(false),
        }
        Ok(true)
    }

    /// Drives the loop to `Done`. A failed fetch aborts with what was merged so far.
    pub async fn run(mut self) -> Result<TimetableByDay, PaginationError> {
        while self.step().await? {}
        info!(
            "Collected {} days of timetable in {} fetch(es)",
            self.timetable.len(),
            self.fetches
        );
        Ok(self.timetable)
    }
}

#[cfg(test)]
#[path = "tests/pagination.rs"]
mod tests;
