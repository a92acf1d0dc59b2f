use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use log::info;

use super::{
    accumulator::TimetableByDay,
    errors::PaginationError,
    pagination::PaginationDriver,
    range_parser::DateRange,
    week_fetcher::{WeekFetcher, WeekSource},
};

/// Today's date on the portal's wall clock.
pub fn today_in(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

pub async fn run<S: WeekSource>(
    source: &S,
    range: DateRange,
    tz: Tz,
) -> Result<TimetableByDay, PaginationError> {
    info!(
        "Fetching timetable from {} to {}",
        range.start.format("%d.%m.%Y"),
        range.end.format("%d.%m.%Y")
    );
    let fetcher = WeekFetcher::new(source, tz);
    PaginationDriver::new(fetcher, range).run().await
}
