use std::{cell::RefCell, collections::HashMap};

use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::{Europe::Warsaw, Tz};
use serde_json::{json, Value};

use super::{
    errors::FetchError,
    models::tile_model::{local_from_millis, Tile},
    week_fetcher::WeekSource,
};

pub const TZ: Tz = Warsaw;

pub fn day(day: u32, month: u32, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(d: u32, month: u32, year: i32, hour: u32, minute: u32) -> NaiveDateTime {
    day(d, month, year).and_hms_opt(hour, minute, 0).unwrap()
}

pub fn millis(local: NaiveDateTime) -> i64 {
    TZ.from_local_datetime(&local).single().unwrap().timestamp_millis()
}

pub fn tile(start: NaiveDateTime, subject: &str) -> Tile {
    Tile {
        start,
        end: start + Duration::minutes(90),
        subject_name: subject.to_owned(),
        locations: vec!["C-13 s. 1.27".to_owned()],
        lecturers: vec!["dr inż. Anna Nowak".to_owned()],
    }
}

pub fn raw_item(start: NaiveDateTime, subject: &str) -> Value {
    json!({
        "dataRozpoczecia": millis(start),
        "dataZakonczenia": millis(start + Duration::minutes(90)),
        "nazwaPelnaPrzedmiotu": subject,
        "sale": [{ "nazwaSkrocona": "C-13 s. 1.27" }],
        "wykladowcy": [{ "stopienImieNazwisko": "dr inż. Anna Nowak" }],
    })
}

pub fn page_json(items: Vec<Value>) -> String {
    json!({ "returnedValue": { "numRows": items.len(), "items": items } }).to_string()
}

/// Serves prepared pages by week start, an empty page for any other week.
#[derive(Default)]
pub struct StubSource {
    pages: HashMap<i64, String>,
    failing: Vec<i64>,
    requested: RefCell<Vec<i64>>,
}

impl StubSource {
    pub fn new() -> StubSource {
        StubSource::default()
    }

    pub fn with_week(mut self, monday: NaiveDate, items: Vec<Value>) -> StubSource {
        self.pages
            .insert(millis(monday.and_hms_opt(0, 0, 0).unwrap()), page_json(items));
        self
    }

    pub fn failing_on(mut self, monday: NaiveDate) -> StubSource {
        self.failing
            .push(millis(monday.and_hms_opt(0, 0, 0).unwrap()));
        self
    }

    pub fn requested_mondays(&self) -> Vec<NaiveDate> {
        self.requested
            .borrow()
            .iter()
            .map(|ms| local_from_millis(*ms, &TZ).unwrap().date())
            .collect()
    }
}

impl WeekSource for StubSource {
    async fn fetch_week(&self, week_start_ms: i64) -> Result<String, FetchError> {
        self.requested.borrow_mut().push(week_start_ms);
        if self.failing.contains(&week_start_ms) {
            return Err(FetchError::InconsistentPage {
                num_rows: 1,
                items: 0,
            });
        }
        Ok(self
            .pages
            .get(&week_start_ms)
            .cloned()
            .unwrap_or_else(|| page_json(Vec::new())))
    }
}
